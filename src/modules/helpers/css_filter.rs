//! CSS filter-function chains (`saturate(1.6) contrast(1.15) blur(0.5px)`)
//! parsed into typed steps and rasterised with the Filter Effects matrices.

use crate::error::FilterParseError;
use image::{DynamicImage, Rgba, RgbaImage};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterFn {
    Brightness(f32),
    Contrast(f32),
    Saturate(f32),
    Sepia(f32),
    Grayscale(f32),
    /// Degrees.
    HueRotate(f32),
    Invert(f32),
    Opacity(f32),
    /// Standard deviation in pixels.
    Blur(f32),
}

enum ColorOp {
    Linear { slope: f32, intercept: f32 },
    Matrix([[f32; 3]; 3]),
    Alpha(f32),
}

impl FilterFn {
    pub fn name(&self) -> &'static str {
        match self {
            FilterFn::Brightness(_) => "brightness",
            FilterFn::Contrast(_) => "contrast",
            FilterFn::Saturate(_) => "saturate",
            FilterFn::Sepia(_) => "sepia",
            FilterFn::Grayscale(_) => "grayscale",
            FilterFn::HueRotate(_) => "hue-rotate",
            FilterFn::Invert(_) => "invert",
            FilterFn::Opacity(_) => "opacity",
            FilterFn::Blur(_) => "blur",
        }
    }

    pub fn is_identity(&self) -> bool {
        match *self {
            FilterFn::Brightness(a) | FilterFn::Contrast(a) | FilterFn::Saturate(a) | FilterFn::Opacity(a) => a == 1.0,
            FilterFn::Sepia(a) | FilterFn::Grayscale(a) | FilterFn::Invert(a) => a == 0.0,
            FilterFn::HueRotate(deg) => deg.rem_euclid(360.0) == 0.0,
            FilterFn::Blur(px) => px <= 0.0,
        }
    }

    fn color_op(&self) -> Option<ColorOp> {
        let op = match *self {
            FilterFn::Brightness(a) => ColorOp::Linear { slope: a, intercept: 0.0 },
            FilterFn::Contrast(a) => ColorOp::Linear { slope: a, intercept: 0.5 - 0.5 * a },
            FilterFn::Invert(a) => {
                let a = a.min(1.0);
                ColorOp::Linear { slope: 1.0 - 2.0 * a, intercept: a }
            }
            FilterFn::Opacity(a) => ColorOp::Alpha(a.min(1.0)),
            FilterFn::Saturate(s) => ColorOp::Matrix([
                [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
                [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
                [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
            ]),
            FilterFn::Sepia(a) => {
                let k = 1.0 - a.min(1.0);
                ColorOp::Matrix([
                    [0.393 + 0.607 * k, 0.769 - 0.769 * k, 0.189 - 0.189 * k],
                    [0.349 - 0.349 * k, 0.686 + 0.314 * k, 0.168 - 0.168 * k],
                    [0.272 - 0.272 * k, 0.534 - 0.534 * k, 0.131 + 0.869 * k],
                ])
            }
            FilterFn::Grayscale(a) => {
                let k = 1.0 - a.min(1.0);
                ColorOp::Matrix([
                    [0.2126 + 0.7874 * k, 0.7152 - 0.7152 * k, 0.0722 - 0.0722 * k],
                    [0.2126 - 0.2126 * k, 0.7152 + 0.2848 * k, 0.0722 - 0.0722 * k],
                    [0.2126 - 0.2126 * k, 0.7152 - 0.7152 * k, 0.0722 + 0.9278 * k],
                ])
            }
            FilterFn::HueRotate(deg) => {
                let (sin, cos) = deg.to_radians().sin_cos();
                ColorOp::Matrix([
                    [0.213 + cos * 0.787 - sin * 0.213, 0.715 - cos * 0.715 - sin * 0.715, 0.072 - cos * 0.072 + sin * 0.928],
                    [0.213 - cos * 0.213 + sin * 0.143, 0.715 + cos * 0.285 + sin * 0.140, 0.072 - cos * 0.072 - sin * 0.283],
                    [0.213 - cos * 0.213 - sin * 0.787, 0.715 - cos * 0.715 + sin * 0.715, 0.072 + cos * 0.928 + sin * 0.072],
                ])
            }
            FilterFn::Blur(_) => return None,
        };
        Some(op)
    }
}

impl fmt::Display for FilterFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            FilterFn::HueRotate(deg) => write!(f, "hue-rotate({}deg)", deg),
            FilterFn::Blur(px) => write!(f, "blur({}px)", px),
            FilterFn::Brightness(a) | FilterFn::Contrast(a) | FilterFn::Saturate(a) | FilterFn::Sepia(a)
            | FilterFn::Grayscale(a) | FilterFn::Invert(a) | FilterFn::Opacity(a) => write!(f, "{}({})", self.name(), a),
        }
    }
}

pub fn to_css(chain: &[FilterFn]) -> String {
    chain.iter().map(|f| f.to_string()).collect::<Vec<_>>().join(" ")
}

pub fn parse_chain(input: &str) -> Result<Vec<FilterFn>, FilterParseError> {
    let mut chain = Vec::new();
    let mut rest = input.trim();
    while !rest.is_empty() {
        let open = rest.find('(').ok_or_else(|| FilterParseError::Malformed(rest.to_string()))?;
        let close = rest.find(')').ok_or_else(|| FilterParseError::Malformed(rest.to_string()))?;
        if close < open { return Err(FilterParseError::Malformed(rest.to_string())); }

        let name = rest[..open].trim();
        let arg = rest[open + 1..close].trim();
        chain.push(parse_function(name, arg)?);
        rest = rest[close + 1..].trim_start();
    }
    Ok(chain)
}

fn parse_function(name: &str, arg: &str) -> Result<FilterFn, FilterParseError> {
    let invalid = || FilterParseError::InvalidArgument { function: name.to_string(), value: arg.to_string() };
    let amount = |default: f32| -> Result<f32, FilterParseError> {
        if arg.is_empty() { return Ok(default); }
        let value = match arg.strip_suffix('%') {
            Some(pct) => pct.trim().parse::<f32>().map_err(|_| invalid())? / 100.0,
            None => arg.parse::<f32>().map_err(|_| invalid())?,
        };
        if value < 0.0 || !value.is_finite() { return Err(invalid()); }
        Ok(value)
    };

    let f = match name {
        "brightness" => FilterFn::Brightness(amount(1.0)?),
        "contrast" => FilterFn::Contrast(amount(1.0)?),
        "saturate" => FilterFn::Saturate(amount(1.0)?),
        "opacity" => FilterFn::Opacity(amount(1.0)?),
        "sepia" => FilterFn::Sepia(amount(1.0)?),
        "grayscale" => FilterFn::Grayscale(amount(1.0)?),
        "invert" => FilterFn::Invert(amount(1.0)?),
        "hue-rotate" => FilterFn::HueRotate(parse_angle(arg).ok_or_else(invalid)?),
        "blur" => FilterFn::Blur(parse_length(arg).ok_or_else(invalid)?),
        other => return Err(FilterParseError::UnknownFunction(other.to_string())),
    };
    Ok(f)
}

fn parse_angle(arg: &str) -> Option<f32> {
    if arg.is_empty() { return Some(0.0); }
    let units: [(&str, f32); 4] = [("deg", 1.0), ("grad", 0.9), ("rad", 180.0 / std::f32::consts::PI), ("turn", 360.0)];
    for (suffix, scale) in units {
        if let Some(n) = arg.strip_suffix(suffix) {
            return n.trim().parse::<f32>().ok().filter(|v| v.is_finite()).map(|v| v * scale);
        }
    }
    arg.parse::<f32>().ok().filter(|v| *v == 0.0)
}

fn parse_length(arg: &str) -> Option<f32> {
    if arg.is_empty() { return Some(0.0); }
    let n = match arg.strip_suffix("px") {
        Some(n) => n.trim().parse::<f32>().ok()?,
        None => arg.parse::<f32>().ok().filter(|v| *v == 0.0)?,
    };
    (n >= 0.0 && n.is_finite()).then_some(n)
}

/// Runs the chain left to right. Colour steps clamp to [0, 1] after each
/// function; consecutive colour steps share one pass over the pixels.
pub fn apply_chain(img: &DynamicImage, chain: &[FilterFn]) -> DynamicImage {
    let active: Vec<FilterFn> = chain.iter().copied().filter(|f| !f.is_identity()).collect();
    if active.is_empty() { return img.clone(); }

    let mut buf: RgbaImage = img.to_rgba8();
    let mut pending: Vec<ColorOp> = Vec::new();
    for f in &active {
        match f.color_op() {
            Some(op) => pending.push(op),
            None => {
                apply_color_ops(&mut buf, &pending);
                pending.clear();
                if let FilterFn::Blur(sigma) = f { buf = image::imageops::blur(&buf, *sigma); }
            }
        }
    }
    apply_color_ops(&mut buf, &pending);
    DynamicImage::ImageRgba8(buf)
}

fn apply_color_ops(buf: &mut RgbaImage, ops: &[ColorOp]) {
    if ops.is_empty() { return; }
    for px in buf.pixels_mut() {
        let Rgba([r, g, b, a]) = *px;
        let mut c = [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0];
        let mut alpha = a as f32 / 255.0;
        for op in ops {
            match op {
                ColorOp::Linear { slope, intercept } => {
                    for v in c.iter_mut() { *v = (*v * slope + intercept).clamp(0.0, 1.0); }
                }
                ColorOp::Matrix(m) => {
                    let [r, g, b] = c;
                    for (v, row) in c.iter_mut().zip(m.iter()) {
                        *v = (row[0] * r + row[1] * g + row[2] * b).clamp(0.0, 1.0);
                    }
                }
                ColorOp::Alpha(k) => alpha = (alpha * k).clamp(0.0, 1.0),
            }
        }
        *px = Rgba([to_u8(c[0]), to_u8(c[1]), to_u8(c[2]), to_u8(alpha)]);
    }
}

fn to_u8(v: f32) -> u8 { (v * 255.0).round() as u8 }

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(rgba: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba(rgba)))
    }

    fn first_pixel(img: &DynamicImage) -> [u8; 4] { img.to_rgba8().get_pixel(0, 0).0 }

    #[test]
    fn test_parse_preset_style_chain() {
        let chain = parse_chain("sepia(0.3) saturate(1.3) hue-rotate(-10deg)").unwrap();
        assert_eq!(chain, vec![FilterFn::Sepia(0.3), FilterFn::Saturate(1.3), FilterFn::HueRotate(-10.0)]);
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_chain("brightness(110%)").unwrap(), vec![FilterFn::Brightness(1.1)]);
        assert_eq!(parse_chain("blur(0.5px)").unwrap(), vec![FilterFn::Blur(0.5)]);
        assert_eq!(parse_chain("hue-rotate(0.5turn)").unwrap(), vec![FilterFn::HueRotate(180.0)]);
        assert_eq!(parse_chain("hue-rotate(0)").unwrap(), vec![FilterFn::HueRotate(0.0)]);
        assert_eq!(parse_chain("grayscale()").unwrap(), vec![FilterFn::Grayscale(1.0)]);
        assert!(parse_chain("").unwrap().is_empty());
        assert!(parse_chain("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(parse_chain("glow(2)"), Err(FilterParseError::UnknownFunction(n)) if n == "glow"));
        assert!(matches!(parse_chain("brightness(-1)"), Err(FilterParseError::InvalidArgument { .. })));
        assert!(matches!(parse_chain("blur(3em)"), Err(FilterParseError::InvalidArgument { .. })));
        assert!(matches!(parse_chain("hue-rotate(15)"), Err(FilterParseError::InvalidArgument { .. })));
        assert!(matches!(parse_chain("contrast(1.2"), Err(FilterParseError::Malformed(_))));
    }

    #[test]
    fn test_css_output_parses_back() {
        let chain = vec![FilterFn::Contrast(1.3), FilterFn::HueRotate(-20.0), FilterFn::Blur(0.5)];
        assert_eq!(to_css(&chain), "contrast(1.3) hue-rotate(-20deg) blur(0.5px)");
        assert_eq!(parse_chain(&to_css(&chain)).unwrap(), chain);
    }

    #[test]
    fn test_identity_chain_leaves_pixels_alone() {
        let img = solid([12, 130, 250, 200]);
        let chain = parse_chain("brightness(100%) contrast(100%) saturate(100%) hue-rotate(0deg)").unwrap();
        assert_eq!(first_pixel(&apply_chain(&img, &chain)), [12, 130, 250, 200]);
    }

    #[test]
    fn test_brightness_zero_is_black_and_keeps_alpha() {
        let out = apply_chain(&solid([200, 100, 50, 128]), &[FilterFn::Brightness(0.0)]);
        assert_eq!(first_pixel(&out), [0, 0, 0, 128]);
    }

    #[test]
    fn test_grayscale_equalises_channels() {
        let [r, g, b, _] = first_pixel(&apply_chain(&solid([220, 40, 90, 255]), &[FilterFn::Grayscale(1.0)]));
        assert!(r.abs_diff(g) <= 1 && g.abs_diff(b) <= 1);
    }

    #[test]
    fn test_contrast_pivots_on_mid_grey() {
        let out = apply_chain(&solid([30, 100, 200, 255]), &[FilterFn::Contrast(1.5)]);
        assert_eq!(first_pixel(&out), [0, 86, 236, 255]);
    }

    #[test]
    fn test_steps_clamp_between_functions() {
        // Brightening past white must not come back once darkened.
        let out = apply_chain(&solid([200, 200, 200, 255]), &[FilterFn::Brightness(2.0), FilterFn::Brightness(0.4)]);
        assert_eq!(first_pixel(&out)[0], 102);
    }

    #[test]
    fn test_order_matters() {
        let img = solid([180, 60, 30, 255]);
        let a = apply_chain(&img, &[FilterFn::Grayscale(1.0), FilterFn::Sepia(1.0)]);
        let b = apply_chain(&img, &[FilterFn::Sepia(1.0), FilterFn::Grayscale(1.0)]);
        assert_ne!(first_pixel(&a), first_pixel(&b));
    }

    #[test]
    fn test_blur_keeps_dimensions() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_fn(16, 9, |x, _| if x < 8 { Rgba([0, 0, 0, 255]) } else { Rgba([255, 255, 255, 255]) }));
        let out = apply_chain(&img, &[FilterFn::Blur(1.5)]);
        assert_eq!((out.width(), out.height()), (16, 9));
        let edge = out.to_rgba8().get_pixel(7, 4).0[0];
        assert!(edge > 0 && edge < 255);
    }
}
