pub mod helpers;
pub mod photo_editor;
