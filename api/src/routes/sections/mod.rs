pub mod document_sections_route;
pub mod navigate_to_section_route;
