pub mod chart_service;
pub mod comparison_service;
pub mod dashboard_service;
pub mod price_source;
pub mod progress;
pub mod report_service;
