pub mod analysis_request;
pub mod analysis_response;
pub mod intelligent_analysis_route;
