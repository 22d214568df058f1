pub mod approval;
pub mod document;
