pub mod css_filter;
pub mod encoded_image;
pub mod image_export;
