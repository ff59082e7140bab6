pub mod report_builder;
pub mod report_service;
