pub mod ai_service;
pub mod generation_service;
pub mod quiz_service;
pub mod scrape_service;
