pub mod demo;
pub mod frequency_response;
pub mod process_file;
