use anyhow::Result;
use clap::Args;
use project_planner::planner::WebsiteFeature;

#[derive(Args)]
pub struct EstimateArgs {
    /// Service id (see `project-planner services`)
    #[arg(short, long)]
    pub service: String,

    /// Industry to plan under (first industry offering the service if omitted)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Component keys to select, comma separated
    #[arg(long, value_delimiter = ',')]
    pub select: Vec<String>,

    /// Quantity for a selected component, as key=count
    #[arg(long = "qty", value_parser = parse_quantity)]
    pub quantities: Vec<(String, u32)>,

    /// Total number of pages (website services)
    #[arg(long)]
    pub pages: Option<u32>,

    /// How many of the pages are dynamic (website services)
    #[arg(long)]
    pub dynamic_pages: Option<u32>,

    /// Website feature to include; repeat for several
    #[arg(long = "feature")]
    pub features: Vec<WebsiteFeature>,

    /// Reveal the estimate immediately
    #[arg(long)]
    pub instant: bool,

    /// Print the estimate as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_quantity(value: &str) -> Result<(String, u32)> {
    let Some((key, count)) = value.split_once('=') else {
        anyhow::bail!("Expected key=count, got '{}'", value);
    };
    let count: u32 = count
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid count in '{}'. Must be a positive integer.", value))?;
    if count == 0 {
        anyhow::bail!("Quantity for '{}' must be at least 1", key.trim());
    }
    Ok((key.trim().to_string(), count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(
            parse_quantity("staff_management=3").unwrap(),
            ("staff_management".to_string(), 3)
        );
        assert!(parse_quantity("staff_management").is_err());
        assert!(parse_quantity("staff_management=0").is_err());
        assert!(parse_quantity("staff_management=many").is_err());
    }
}
