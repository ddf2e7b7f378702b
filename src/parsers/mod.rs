pub mod course;
pub mod form;
pub mod semester;
pub mod text;
