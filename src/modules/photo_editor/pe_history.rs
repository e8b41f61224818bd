use crate::modules::helpers::encoded_image::EncodedImage;

/// Linear stack of committed images. The last entry is the one on screen.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<EncodedImage>,
    /// 0 keeps every entry.
    cap: usize,
}

impl History {
    pub fn new() -> Self { Self::default() }

    pub fn with_cap(cap: usize) -> Self { Self { entries: Vec::new(), cap } }

    pub fn set_cap(&mut self, cap: usize) {
        self.cap = cap;
        self.enforce_cap();
    }

    pub fn reset(&mut self, image: EncodedImage) {
        self.entries.clear();
        self.entries.push(image);
    }

    pub fn push(&mut self, image: EncodedImage) {
        self.entries.push(image);
        self.enforce_cap();
    }

    /// Drops the top entry and returns the new one. A no-op at one entry or fewer.
    pub fn undo(&mut self) -> Option<&EncodedImage> {
        if self.entries.len() <= 1 { return None; }
        self.entries.pop();
        self.entries.last()
    }

    pub fn current(&self) -> Option<&EncodedImage> { self.entries.last() }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    pub fn can_undo(&self) -> bool { self.entries.len() > 1 }

    fn enforce_cap(&mut self) {
        if self.cap == 0 || self.entries.len() <= self.cap { return; }
        let excess = self.entries.len() - self.cap;
        self.entries.drain(..excess);
        log::debug!("History trimmed by {} entries", excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn img(shade: u8) -> EncodedImage { EncodedImage::solid(1, 1, [shade, shade, shade, 255]) }

    #[test]
    fn test_undo_walks_back_then_stops() {
        let (a, b, c) = (img(1), img(2), img(3));
        let mut h = History::new();
        h.reset(a.clone());
        h.push(b.clone());
        h.push(c.clone());

        assert_eq!(h.undo(), Some(&b));
        assert_eq!(h.undo(), Some(&a));
        assert_eq!(h.undo(), None);
        assert_eq!(h.len(), 1);
        assert_eq!(h.current(), Some(&a));
    }

    #[test]
    fn test_undo_on_empty_is_noop() {
        let mut h = History::new();
        assert_eq!(h.undo(), None);
        assert!(h.is_empty());
        assert!(!h.can_undo());
    }

    #[test]
    fn test_n_undos_land_on_expected_entry() {
        let images: Vec<EncodedImage> = (0..6).map(img).collect();
        for n in 0..images.len() {
            let mut h = History::new();
            h.reset(images[0].clone());
            for i in &images[1..] { h.push(i.clone()); }
            for _ in 0..n { h.undo(); }
            assert_eq!(h.current(), Some(&images[images.len() - 1 - n]));
        }
    }

    #[test]
    fn test_reset_discards_previous_entries() {
        let mut h = History::new();
        h.reset(img(1));
        h.push(img(2));
        h.reset(img(9));
        assert_eq!(h.len(), 1);
        assert_eq!(h.current(), Some(&img(9)));
    }

    #[test]
    fn test_cap_evicts_oldest_and_keeps_newest() {
        let mut h = History::with_cap(3);
        h.reset(img(0));
        for s in 1..10 { h.push(img(s)); }
        assert_eq!(h.len(), 3);
        assert_eq!(h.current(), Some(&img(9)));
        assert_eq!(h.undo(), Some(&img(8)));

        h.set_cap(1);
        assert_eq!(h.len(), 1);
        assert_eq!(h.current(), Some(&img(8)));
    }
}
