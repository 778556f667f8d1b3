use crate::planner::blueprints::{Blueprint, BlueprintId};
use crate::planner::catalog::{CatalogError, ComponentDefinition as C};
use crate::planner::grouping::{Accent, GroupConfig};

/// Booking & interaction blueprint: appointments, clients, staff
pub fn interaction() -> Result<Blueprint, CatalogError> {
    let components = vec![
        // Primary
        C::new("core_platform", "Core Platform", 0)
            .describe("Hosting, deployment pipeline and the base application shell")
            .mandatory(),
        C::new("user_accounts", "User Accounts", 0)
            .describe("Sign-up, login and profile management for customers")
            .requires(&["core_platform"])
            .mandatory(),
        C::new("admin_panel", "Admin Panel", 0)
            .describe("Back-office dashboard for managing the business")
            .requires(&["core_platform"])
            .mandatory(),
        // Scaffolding
        C::new("notification_service", "Notification Service", 2500)
            .describe("Email and push delivery pipeline")
            .requires(&["core_platform"])
            .hidden(),
        C::new("scheduling_engine", "Scheduling Engine", 4000)
            .describe("Availability rules and conflict detection")
            .requires(&["core_platform"])
            .hidden(),
        // Booking
        C::new("booking_calendar", "Booking Calendar", 8000)
            .describe("Customers pick a date and time for an appointment")
            .requires(&["user_accounts", "scheduling_engine"]),
        C::new("slot_management", "Slot Management", 4500)
            .describe("Custom durations, buffers and capacity per slot")
            .requires(&["booking_calendar"]),
        C::new("reminders", "Automated Reminders", 3000)
            .describe("Email and SMS reminders before each appointment")
            .requires(&["booking_calendar", "notification_service"]),
        C::new("waitlist", "Waitlist", 3500)
            .describe("Offer freed-up slots to waiting customers automatically")
            .requires(&["slot_management", "notification_service"]),
        C::new("video_consultation", "Video Consultation", 12000)
            .describe("Hold appointments over built-in video calls")
            .requires(&["booking_calendar", "online_payments"]),
        // Payments
        C::new("online_payments", "Online Payments", 7000)
            .describe("Collect deposits and full payments at booking time")
            .requires(&["user_accounts"]),
        C::new("invoicing", "Invoicing", 4000)
            .describe("Generate and email GST-ready invoices")
            .requires(&["online_payments"]),
        C::new("memberships", "Memberships & Packages", 6500)
            .describe("Sell session bundles and recurring memberships")
            .requires(&["online_payments", "booking_calendar"]),
        // Engagement
        C::new("reviews_ratings", "Reviews & Ratings", 3500)
            .describe("Let customers rate visits and leave feedback")
            .requires(&["user_accounts"]),
        C::new("live_chat", "Live Chat", 5000)
            .describe("Real-time chat between customers and staff")
            .requires(&["user_accounts", "notification_service"]),
        C::new("loyalty_program", "Loyalty Program", 5500)
            .describe("Reward points for repeat bookings")
            .requires(&["online_payments"]),
        // Operations
        C::new("staff_management", "Staff Management", 6000)
            .describe("Staff profiles, shifts and per-staff calendars")
            .requires(&["admin_panel", "booking_calendar"]),
        C::new("analytics_dashboard", "Analytics Dashboard", 5000)
            .describe("Bookings, revenue and retention reports")
            .requires(&["admin_panel"]),
        C::new("multi_location", "Multi-location Support", 9000)
            .describe("Run several branches from one account")
            .requires(&["staff_management"]),
    ];

    let groups = vec![
        GroupConfig::new(
            "Platform Essentials",
            Accent::Blue,
            &["core_platform", "user_accounts", "admin_panel", "notification_service"],
        ),
        GroupConfig::new(
            "Booking & Scheduling",
            Accent::Green,
            &[
                "booking_calendar",
                "slot_management",
                "reminders",
                "waitlist",
                "video_consultation",
            ],
        ),
        GroupConfig::new(
            "Payments",
            Accent::Orange,
            &["online_payments", "invoicing", "memberships"],
        ),
        GroupConfig::new(
            "Customer Engagement",
            Accent::Rose,
            &["reviews_ratings", "live_chat", "loyalty_program"],
        ),
        GroupConfig::new(
            "Operations",
            Accent::Purple,
            &["staff_management", "analytics_dashboard", "multi_location"],
        ),
    ];

    Blueprint::new(BlueprintId::Interaction, components, groups)
}
