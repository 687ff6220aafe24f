//! Presentation slides.
//!
//! A slide starts at a numbered top-level header (`# 1 Intro`, `# 2. Details`)
//! and runs until the next one. Lines before the first numbered header are
//! not part of any slide.

/// Split `body` into slides.
///
/// Returns an empty sequence when presentation mode is disabled, the body is
/// empty, or no numbered top-level header exists.
pub fn parse_slides(body: &str, presentation: bool) -> Vec<String> {
    if !presentation || body.is_empty() {
        return Vec::new();
    }

    let mut slides = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut found_header = false;

    for line in body.split('\n') {
        let is_header = is_numbered_header(line);
        if is_header {
            found_header = true;
            if !current.is_empty() {
                slides.push(current.join("\n"));
                current.clear();
            }
        }
        if found_header {
            current.push(line);
        }
    }

    if !current.is_empty() {
        slides.push(current.join("\n"));
    }
    slides
}

fn is_numbered_header(line: &str) -> bool {
    line.trim()
        .strip_prefix("# ")
        .map(str::trim)
        .and_then(|text| text.chars().next())
        .is_some_and(|c| c.is_ascii_digit())
}

/// An ordered slide sequence with a cursor.
///
/// The cursor is always a valid index; a deck is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideDeck {
    slides: Vec<String>,
    current: usize,
}

impl SlideDeck {
    /// Build a deck from `body`, or `None` when slide mode does not apply.
    pub fn from_body(body: &str, presentation: bool) -> Option<Self> {
        let slides = parse_slides(body, presentation);
        if slides.is_empty() {
            tracing::debug!("no numbered h1 headers found, slide mode disabled");
            return None;
        }
        tracing::info!(slides = slides.len(), "slide mode enabled");
        Some(Self { slides, current: 0 })
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub const fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &str {
        &self.slides[self.current]
    }

    /// Advance one slide. Returns false when already at the last slide.
    pub fn next(&mut self) -> bool {
        if self.current + 1 < self.slides.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Go back one slide. Returns false when already at the first slide.
    pub fn previous(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Status bar indicator, e.g. ` [Slide 2/5]`.
    pub fn indicator(&self) -> String {
        format!(" [Slide {}/{}]", self.current + 1, self.slides.len())
    }
}
