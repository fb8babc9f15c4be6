pub mod bulk_upload_route;
pub mod delete_document_route;
pub mod get_document_route;
pub mod list_documents_route;
pub mod update_type_route;
pub mod upload_route;
pub mod upload_type_query;
