//! Viewport management for scrolling.
//!
//! The [`Viewport`] owns the rendered content currently on screen and tracks
//! which window of it is visible.

use std::ops::Range;

use ratatui::text::{Line, Text};

/// The visible window into rendered content.
///
/// The viewport tracks:
/// - Content area dimensions (width, height)
/// - Current scroll offset (in lines)
/// - The rendered content and its length
///
/// # Example
///
/// ```
/// use mdpager::ui::viewport::Viewport;
/// use ratatui::text::Text;
///
/// let mut vp = Viewport::new(80, 24);
/// vp.set_content(Text::from((0..100).map(|i| i.to_string()).collect::<Vec<_>>().join("\n")));
/// assert_eq!(vp.visible_range(), 0..24);
///
/// vp.scroll_down(10);
/// assert_eq!(vp.visible_range(), 10..34);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    content: Text<'static>,
}

impl Viewport {
    /// Create an empty viewport.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            offset: 0,
            content: Text::default(),
        }
    }

    /// Get the current scroll offset.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Get the viewport width.
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the viewport height.
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Get the total number of content lines.
    pub fn total_lines(&self) -> usize {
        self.content.lines.len()
    }

    /// Replace the content, keeping the offset when it still fits.
    pub fn set_content(&mut self, content: Text<'static>) {
        self.content = content;
        if self.offset > self.total_lines().saturating_sub(1) {
            self.go_to_bottom();
        }
    }

    /// Drop all content and return to the top.
    pub fn clear(&mut self) {
        self.content = Text::default();
        self.offset = 0;
    }

    /// Get the range of visible lines.
    ///
    /// Returns a range from the current offset to offset + height,
    /// clamped to the content bounds.
    pub fn visible_range(&self) -> Range<usize> {
        let end = (self.offset + self.height as usize).min(self.total_lines());
        let start = self.offset.min(end);
        start..end
    }

    /// The lines currently on screen.
    pub fn visible_lines(&self) -> &[Line<'static>] {
        &self.content.lines[self.visible_range()]
    }

    /// Fraction of the content scrolled past, in `[0, 1]`.
    ///
    /// Content that fits entirely on screen counts as fully scrolled.
    pub fn scroll_percent(&self) -> f64 {
        let total = self.total_lines();
        let height = self.height as usize;
        if height >= total {
            return 1.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let fraction = self.offset as f64 / (total - height) as f64;
        fraction.clamp(0.0, 1.0)
    }

    pub const fn at_top(&self) -> bool {
        self.offset == 0
    }

    pub fn at_bottom(&self) -> bool {
        self.offset >= self.max_offset()
    }

    /// Scroll up by n lines.
    pub const fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    /// Scroll down by n lines.
    pub fn scroll_down(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.max_offset());
    }

    /// Scroll up one page.
    pub const fn page_up(&mut self) {
        self.scroll_up(self.height as usize);
    }

    /// Scroll down one page.
    pub fn page_down(&mut self) {
        self.scroll_down(self.height as usize);
    }

    /// Scroll up half a page.
    pub const fn half_page_up(&mut self) {
        self.scroll_up(self.height as usize / 2);
    }

    /// Scroll down half a page.
    pub fn half_page_down(&mut self) {
        self.scroll_down(self.height as usize / 2);
    }

    /// Go to the beginning of the content.
    pub const fn go_to_top(&mut self) {
        self.offset = 0;
    }

    /// Go to the end of the content.
    pub fn go_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Resize the viewport.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Calculate the maximum valid offset.
    fn max_offset(&self) -> usize {
        self.total_lines().saturating_sub(self.height as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(total_lines: usize) -> Text<'static> {
        Text::from(
            (0..total_lines)
                .map(|i| Line::raw(format!("line {i}")))
                .collect::<Vec<_>>(),
        )
    }

    fn viewport(height: u16, total_lines: usize) -> Viewport {
        let mut vp = Viewport::new(80, height);
        vp.set_content(lines(total_lines));
        vp
    }

    #[test]
    fn test_new_viewport_starts_at_top() {
        let vp = viewport(24, 100);
        assert_eq!(vp.offset(), 0);
        assert!(vp.at_top());
    }

    #[test]
    fn test_visible_range_at_top() {
        let vp = viewport(24, 100);
        assert_eq!(vp.visible_range(), 0..24);
    }

    #[test]
    fn test_visible_range_at_bottom() {
        let mut vp = viewport(24, 100);
        vp.go_to_bottom();
        assert_eq!(vp.visible_range(), 76..100);
        assert!(vp.at_bottom());
    }

    #[test]
    fn test_visible_range_with_short_document() {
        let vp = viewport(24, 10);
        assert_eq!(vp.visible_range(), 0..10);
    }

    #[test]
    fn test_visible_lines_follow_offset() {
        let mut vp = viewport(3, 10);
        vp.scroll_down(4);
        let lines: Vec<String> = vp
            .visible_lines()
            .iter()
            .map(|line| line.spans[0].content.to_string())
            .collect();
        assert_eq!(lines, vec!["line 4", "line 5", "line 6"]);
    }

    #[test]
    fn test_scroll_down_clamps_to_max() {
        let mut vp = viewport(24, 100);
        vp.scroll_down(1000);
        assert_eq!(vp.offset(), 76);
    }

    #[test]
    fn test_scroll_up_clamps_to_zero() {
        let mut vp = viewport(24, 100);
        vp.scroll_down(10);
        vp.scroll_up(100);
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_page_down_and_up() {
        let mut vp = viewport(24, 100);
        vp.page_down();
        assert_eq!(vp.offset(), 24);
        vp.scroll_down(26);
        vp.page_up();
        assert_eq!(vp.offset(), 26);
    }

    #[test]
    fn test_half_page_down() {
        let mut vp = viewport(24, 100);
        vp.half_page_down();
        assert_eq!(vp.offset(), 12);
    }

    #[test]
    fn test_half_page_up() {
        let mut vp = viewport(24, 100);
        vp.scroll_down(50);
        vp.half_page_up();
        assert_eq!(vp.offset(), 38);
    }

    #[test]
    fn test_go_to_top() {
        let mut vp = viewport(24, 100);
        vp.scroll_down(50);
        vp.go_to_top();
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_scroll_percent_at_top_and_bottom() {
        let mut vp = viewport(24, 100);
        assert!(vp.scroll_percent().abs() < f64::EPSILON);
        vp.go_to_bottom();
        assert!((vp.scroll_percent() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scroll_percent_midway() {
        let mut vp = viewport(20, 120);
        vp.scroll_down(50);
        assert!((vp.scroll_percent() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scroll_percent_short_or_empty_document() {
        assert!((viewport(24, 10).scroll_percent() - 1.0).abs() < f64::EPSILON);
        assert!((viewport(24, 0).scroll_percent() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_keeps_valid_offset() {
        let mut vp = viewport(24, 100);
        vp.scroll_down(50);
        vp.resize(80, 60);
        assert_eq!(vp.offset(), 40);
    }

    #[test]
    fn test_set_content_keeps_offset_when_it_fits() {
        let mut vp = viewport(10, 100);
        vp.scroll_down(30);
        vp.set_content(lines(80));
        assert_eq!(vp.offset(), 30);
    }

    #[test]
    fn test_set_content_shorter_than_offset_goes_to_bottom() {
        let mut vp = viewport(10, 100);
        vp.scroll_down(80);
        vp.set_content(lines(50));
        assert_eq!(vp.offset(), 40);
        assert!(vp.at_bottom());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut vp = viewport(10, 100);
        vp.scroll_down(20);
        vp.clear();
        assert_eq!(vp.offset(), 0);
        assert_eq!(vp.total_lines(), 0);
    }

    #[test]
    fn test_resize_changes_both_dimensions() {
        let mut vp = viewport(10, 100);
        vp.resize(60, 5);
        assert_eq!(vp.width(), 60);
        assert_eq!(vp.height(), 5);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn scroll_never_exceeds_bounds(
                total_lines in 1..2000usize,
                height in 1..100u16,
                scroll_amount in 0..5000usize,
            ) {
                let mut vp = viewport(height, total_lines);
                vp.scroll_down(scroll_amount);

                let max = total_lines.saturating_sub(height as usize);
                prop_assert!(vp.offset() <= max);
            }

            #[test]
            fn visible_range_within_bounds(
                total_lines in 0..2000usize,
                height in 1..100u16,
                offset in 0..5000usize,
            ) {
                let mut vp = viewport(height, total_lines);
                vp.scroll_down(offset);

                let range = vp.visible_range();
                prop_assert!(range.start <= range.end);
                prop_assert!(range.end <= total_lines);
            }

            #[test]
            fn percent_always_valid(
                total_lines in 0..2000usize,
                height in 1..100u16,
                offset in 0..5000usize,
            ) {
                let mut vp = viewport(height, total_lines);
                vp.scroll_down(offset);

                let percent = vp.scroll_percent();
                prop_assert!((0.0..=1.0).contains(&percent));
            }

            #[test]
            fn resize_keeps_offset_valid(
                total_lines in 0..2000usize,
                height in 1..100u16,
                new_height in 0..100u16,
                offset in 0..5000usize,
            ) {
                let mut vp = viewport(height, total_lines);
                vp.scroll_down(offset);
                vp.resize(80, new_height);
                prop_assert!(vp.offset() <= total_lines.saturating_sub(new_height as usize));
            }
        }
    }
}
