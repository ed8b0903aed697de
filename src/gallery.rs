//! Full-screen media viewer state for a listing's images and videos.

use serde::Serialize;

const VIDEO_EXTENSIONS: [&str; 3] = [".mp4", ".mov", ".avi"];

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a media URL by its file extension
    pub fn of(url: &str) -> Self {
        let lower = url.to_ascii_lowercase();
        if VIDEO_EXTENSIONS.iter().any(|ext| lower.contains(ext)) {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

/// Keys the viewer responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Escape" => Key::Escape,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gallery {
    media: Vec<String>,
    current: usize,
    open: bool,
    video_playing: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Thumbnail {
    pub index: usize,
    pub url: String,
    pub kind: MediaKind,
    pub selected: bool,
}

impl Gallery {
    /// Open the viewer at `initial`, clamped into range
    pub fn open(media: Vec<String>, initial: usize) -> Self {
        let current = initial.min(media.len().saturating_sub(1));
        Self {
            media,
            current,
            open: true,
            video_playing: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_empty(&self) -> bool {
        self.media.is_empty()
    }

    pub fn len(&self) -> usize {
        self.media.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&str> {
        self.media.get(self.current).map(String::as_str)
    }

    pub fn current_kind(&self) -> Option<MediaKind> {
        self.current().map(MediaKind::of)
    }

    pub fn is_video_playing(&self) -> bool {
        self.video_playing
    }

    /// Index `next` would move to
    pub fn next_index(&self) -> usize {
        if self.media.is_empty() || self.current + 1 >= self.media.len() {
            0
        } else {
            self.current + 1
        }
    }

    /// Index `previous` would move to
    pub fn previous_index(&self) -> usize {
        if self.current == 0 {
            self.media.len().saturating_sub(1)
        } else {
            self.current - 1
        }
    }

    pub fn next(&mut self) {
        self.current = self.next_index();
        self.video_playing = false;
    }

    pub fn previous(&mut self) {
        self.current = self.previous_index();
        self.video_playing = false;
    }

    /// Jump to a thumbnail; out-of-range indices are ignored
    pub fn select(&mut self, index: usize) {
        if index < self.media.len() {
            self.current = index;
            self.video_playing = false;
        }
    }

    pub fn close(&mut self) {
        self.open = false;
        self.video_playing = false;
    }

    /// Flip playback; only meaningful while a video is shown
    pub fn toggle_video(&mut self) {
        if self.current_kind() == Some(MediaKind::Video) {
            self.video_playing = !self.video_playing;
        }
    }

    pub fn handle_key(&mut self, key: Key) {
        if !self.open {
            return;
        }
        match key {
            Key::ArrowLeft => self.previous(),
            Key::ArrowRight => self.next(),
            Key::Escape => self.close(),
            Key::Other => {}
        }
    }

    pub fn thumbnails(&self) -> Vec<Thumbnail> {
        self.media
            .iter()
            .enumerate()
            .map(|(index, url)| Thumbnail {
                index,
                url: url.clone(),
                kind: MediaKind::of(url),
                selected: index == self.current,
            })
            .collect()
    }

    /// True when any item is a video
    pub fn has_video(&self) -> bool {
        self.media.iter().any(|url| MediaKind::of(url) == MediaKind::Video)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://cdn.example.com/{i}.jpg")).collect()
    }

    #[test]
    fn test_next_and_previous_wrap_for_every_length() {
        for len in 1..8 {
            let mut gallery = Gallery::open(media(len), len - 1);
            gallery.next();
            assert_eq!(gallery.current_index(), 0, "len={len}");
            gallery.previous();
            assert_eq!(gallery.current_index(), len - 1, "len={len}");
        }
    }

    #[test]
    fn test_single_item_stays_put() {
        let mut gallery = Gallery::open(media(1), 0);
        gallery.next();
        assert_eq!(gallery.current_index(), 0);
        gallery.previous();
        assert_eq!(gallery.current_index(), 0);
    }

    #[test]
    fn test_initial_index_is_clamped() {
        let gallery = Gallery::open(media(3), 10);
        assert_eq!(gallery.current_index(), 2);

        let empty = Gallery::open(Vec::new(), 4);
        assert_eq!(empty.current_index(), 0);
        assert!(empty.current().is_none());
    }

    #[test]
    fn test_keyboard_navigates_and_closes() {
        let mut gallery = Gallery::open(media(3), 0);
        gallery.handle_key(Key::from_dom("ArrowLeft"));
        assert_eq!(gallery.current_index(), 2);
        gallery.handle_key(Key::from_dom("ArrowRight"));
        assert_eq!(gallery.current_index(), 0);
        gallery.handle_key(Key::from_dom("Enter"));
        assert_eq!(gallery.current_index(), 0);

        gallery.handle_key(Key::Escape);
        assert!(!gallery.is_open());

        gallery.handle_key(Key::ArrowRight);
        assert_eq!(gallery.current_index(), 0, "closed viewer ignores keys");
    }

    #[test]
    fn test_video_detection_uses_extension() {
        assert_eq!(MediaKind::of("https://cdn.example.com/tour.MP4"), MediaKind::Video);
        assert_eq!(MediaKind::of("https://cdn.example.com/tour.mov?token=1"), MediaKind::Video);
        assert_eq!(MediaKind::of("https://cdn.example.com/front.webp"), MediaKind::Image);
    }

    #[test]
    fn test_navigation_stops_playback() {
        let mut gallery = Gallery::open(
            vec!["https://cdn.example.com/tour.mp4".into(), "https://cdn.example.com/a.jpg".into()],
            0,
        );
        assert!(gallery.has_video());
        gallery.toggle_video();
        assert!(gallery.is_video_playing());

        gallery.next();
        assert!(!gallery.is_video_playing());

        gallery.toggle_video();
        assert!(!gallery.is_video_playing(), "images cannot play");
    }

    #[test]
    fn test_select_ignores_out_of_range() {
        let mut gallery = Gallery::open(media(4), 1);
        gallery.select(3);
        assert_eq!(gallery.current_index(), 3);
        gallery.select(4);
        assert_eq!(gallery.current_index(), 3);

        let thumbs = gallery.thumbnails();
        assert_eq!(thumbs.iter().filter(|t| t.selected).count(), 1);
        assert!(thumbs[3].selected);
    }
}
