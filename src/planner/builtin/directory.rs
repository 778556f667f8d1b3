use crate::planner::blueprints::BlueprintId;
use crate::planner::catalog::CatalogError;
use crate::planner::services::{Category, Service, ServiceDirectory, ServiceKind};

pub fn directory() -> Result<ServiceDirectory, CatalogError> {
    let services = vec![
        Service::new(
            "appointment-booking",
            "Appointment Booking App",
            "Web and mobile booking for appointment-driven businesses",
            ServiceKind::Modules(BlueprintId::Interaction),
        ),
        Service::new(
            "client-portal",
            "Client Portal",
            "Self-service portal for bookings, payments and messaging",
            ServiceKind::Modules(BlueprintId::Interaction),
        ),
        Service::new(
            "online-store",
            "Online Store",
            "A complete D2C e-commerce store",
            ServiceKind::Modules(BlueprintId::Commerce),
        ),
        Service::new(
            "marketplace",
            "Marketplace Platform",
            "Multi-vendor commerce combined with bookable services",
            ServiceKind::Universal,
        ),
        Service::new(
            "business-website",
            "Business Website",
            "Informational website priced by pages and features",
            ServiceKind::WebsitePages,
        ),
    ];

    let categories = vec![
        Category::new(
            "healthcare",
            "Healthcare & Wellness",
            "Clinics, therapists, gyms and spas",
            &["appointment-booking", "client-portal", "business-website"],
        ),
        Category::new(
            "hospitality",
            "Hospitality",
            "Restaurants, salons and event venues",
            &["appointment-booking", "marketplace", "business-website"],
        ),
        Category::new(
            "retail",
            "Retail & D2C",
            "Brands and shops selling products online",
            &["online-store", "marketplace", "business-website"],
        ),
        Category::new(
            "education",
            "Education & Coaching",
            "Tutors, academies and course creators",
            &["client-portal", "online-store", "business-website"],
        ),
        Category::new(
            "startups",
            "Startups",
            "Early-stage products that need an MVP",
            &["marketplace", "online-store", "appointment-booking"],
        ),
    ];

    ServiceDirectory::new(categories, services)
}
