//! Style run surface.
//!
//! The style system itself (fonts, colors, resolution) lives outside this
//! core; paragraphs only expose styles at code point granularity as half-open
//! `[start, start + length)` runs keyed by opaque [`StyleId`]s.

/// Opaque handle into the external style system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleId(pub u32);

impl StyleId {
    /// The default style every paragraph starts with.
    pub const DEFAULT: StyleId = StyleId(0);
}

/// A contiguous run of identically styled code points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleRun {
    /// Start code point index (inclusive).
    pub start: usize,
    /// Run length in code points.
    pub length: usize,
    /// Style of the run.
    pub style: StyleId,
}

impl StyleRun {
    /// Create a new run.
    pub fn new(start: usize, length: usize, style: StyleId) -> Self {
        Self {
            start,
            length,
            style,
        }
    }

    /// Exclusive end index.
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// An ordered, gap-free, non-overlapping run list covering `[0, total_length)`.
///
/// Maintains the invariant on every mutation; adjacent runs with equal styles
/// are coalesced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRunList {
    runs: Vec<StyleRun>,
}

impl StyleRunList {
    /// A single default-styled run over `length` code points.
    pub fn new(length: usize) -> Self {
        Self {
            runs: vec![StyleRun::new(0, length, StyleId::DEFAULT)],
        }
    }

    /// Build a list from already ordered, zero-based runs.
    pub fn from_runs(runs: Vec<StyleRun>) -> Self {
        let runs = coalesce(runs);
        Self {
            runs: if runs.is_empty() {
                vec![StyleRun::new(0, 0, StyleId::DEFAULT)]
            } else {
                runs
            },
        }
    }

    /// All runs, in order.
    pub fn runs(&self) -> &[StyleRun] {
        &self.runs
    }

    /// Total covered length.
    pub fn total_length(&self) -> usize {
        self.runs.last().map(|r| r.end()).unwrap_or(0)
    }

    /// Style at `position`. A position at the very end takes the final run's
    /// style (callers pass caret positions, which may sit at `total_length`).
    pub fn style_at(&self, position: usize) -> StyleId {
        for run in &self.runs {
            if position < run.end() {
                return run.style;
            }
        }
        self.runs.last().map(|r| r.style).unwrap_or(StyleId::DEFAULT)
    }

    /// The runs overlapping `[position, position + length)`, clipped to it.
    pub fn runs_in_range(&self, position: usize, length: usize) -> Vec<StyleRun> {
        let end = position + length;
        let mut out = Vec::new();
        for run in &self.runs {
            if run.end() <= position || run.start >= end {
                continue;
            }
            let start = run.start.max(position);
            let stop = run.end().min(end);
            out.push(StyleRun::new(start, stop - start, run.style));
        }
        out
    }

    /// Apply `style` over `[position, position + length)`, splitting runs at
    /// the boundaries.
    pub fn apply(&mut self, style: StyleId, position: usize, length: usize) {
        if length == 0 {
            return;
        }
        let end = position + length;
        let mut out: Vec<StyleRun> = Vec::with_capacity(self.runs.len() + 2);
        for run in &self.runs {
            if run.end() <= position || run.start >= end {
                out.push(*run);
                continue;
            }
            if run.start < position {
                out.push(StyleRun::new(run.start, position - run.start, run.style));
            }
            let mid_start = run.start.max(position);
            let mid_end = run.end().min(end);
            out.push(StyleRun::new(mid_start, mid_end - mid_start, style));
            if run.end() > end {
                out.push(StyleRun::new(end, run.end() - end, run.style));
            }
        }
        self.runs = coalesce(out);
    }

    /// Remove `[position, position + length)` code points, shifting later runs.
    pub fn delete(&mut self, position: usize, length: usize) {
        if length == 0 {
            return;
        }
        let end = position + length;
        let mut out = Vec::with_capacity(self.runs.len());
        for run in &self.runs {
            let start = if run.start < position {
                run.start
            } else {
                run.start.saturating_sub(length).max(position)
            };
            let removed = run.end().min(end).saturating_sub(run.start.max(position));
            let new_len = run.length - removed;
            if new_len > 0 {
                out.push(StyleRun::new(start, new_len, run.style));
            }
        }
        self.runs = coalesce(out);
        if self.runs.is_empty() {
            self.runs.push(StyleRun::new(0, 0, StyleId::DEFAULT));
        }
    }

    /// Insert `length` code points at `position`, inheriting the style in
    /// effect there.
    pub fn insert(&mut self, position: usize, length: usize) {
        if length == 0 {
            return;
        }
        let style = if position > 0 {
            self.style_at(position - 1)
        } else {
            self.style_at(position)
        };
        let total = self.total_length();
        let mut out = self.runs_in_range(0, position);
        out.push(StyleRun::new(position, length, style));
        for run in self.runs_in_range(position, total - position) {
            out.push(StyleRun::new(run.start + length, run.length, run.style));
        }
        self.runs = coalesce(out);
    }

    /// Split off the runs covering `[position, total_length)` into a new list
    /// rebased at zero; this list keeps `[0, position)`.
    pub fn split_off(&mut self, position: usize) -> StyleRunList {
        let total = self.total_length();
        let tail_runs: Vec<StyleRun> = self
            .runs_in_range(position, total - position)
            .into_iter()
            .map(|r| StyleRun::new(r.start - position, r.length, r.style))
            .collect();
        let head_runs = self.runs_in_range(0, position);
        self.runs = if head_runs.is_empty() {
            vec![StyleRun::new(0, 0, StyleId::DEFAULT)]
        } else {
            coalesce(head_runs)
        };
        StyleRunList {
            runs: if tail_runs.is_empty() {
                vec![StyleRun::new(0, 0, StyleId::DEFAULT)]
            } else {
                coalesce(tail_runs)
            },
        }
    }

    /// Append `other`'s runs after this list's content.
    pub fn append(&mut self, other: &StyleRunList) {
        let base = self.total_length();
        let mut out = std::mem::take(&mut self.runs);
        for run in other.runs() {
            if run.length > 0 {
                out.push(StyleRun::new(base + run.start, run.length, run.style));
            }
        }
        self.runs = coalesce(out);
        if self.runs.is_empty() {
            self.runs.push(StyleRun::new(0, 0, StyleId::DEFAULT));
        }
    }

    /// Extend the final run by `extra` code points.
    pub fn extend_last(&mut self, extra: usize) {
        if let Some(last) = self.runs.last_mut() {
            last.length += extra;
        }
    }
}

fn coalesce(runs: Vec<StyleRun>) -> Vec<StyleRun> {
    let mut out: Vec<StyleRun> = Vec::with_capacity(runs.len());
    for run in runs {
        if run.length == 0 {
            continue;
        }
        if let Some(last) = out.last_mut()
            && last.style == run.style
            && last.end() == run.start
        {
            last.length += run.length;
            continue;
        }
        out.push(run);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_splits_runs_half_open() {
        let mut list = StyleRunList::new(10);
        list.apply(StyleId(1), 3, 4);
        assert_eq!(
            list.runs(),
            &[
                StyleRun::new(0, 3, StyleId::DEFAULT),
                StyleRun::new(3, 4, StyleId(1)),
                StyleRun::new(7, 3, StyleId::DEFAULT),
            ]
        );
        assert_eq!(list.style_at(2), StyleId::DEFAULT);
        assert_eq!(list.style_at(3), StyleId(1));
        assert_eq!(list.style_at(6), StyleId(1));
        assert_eq!(list.style_at(7), StyleId::DEFAULT);
    }

    #[test]
    fn test_apply_coalesces_equal_neighbors() {
        let mut list = StyleRunList::new(10);
        list.apply(StyleId(1), 0, 5);
        list.apply(StyleId(1), 5, 5);
        assert_eq!(list.runs(), &[StyleRun::new(0, 10, StyleId(1))]);
    }

    #[test]
    fn test_runs_in_range_clips() {
        let mut list = StyleRunList::new(10);
        list.apply(StyleId(2), 4, 3);
        let runs = list.runs_in_range(5, 4);
        assert_eq!(
            runs,
            vec![
                StyleRun::new(5, 2, StyleId(2)),
                StyleRun::new(7, 2, StyleId::DEFAULT),
            ]
        );
    }

    #[test]
    fn test_delete_shifts_following_runs() {
        let mut list = StyleRunList::new(10);
        list.apply(StyleId(1), 4, 2);
        list.delete(2, 3);
        // 10 - 3 = 7 code points remain; the styled run lost its first cp.
        assert_eq!(list.total_length(), 7);
        assert_eq!(list.style_at(2), StyleId(1));
        assert_eq!(list.style_at(3), StyleId::DEFAULT);
    }

    #[test]
    fn test_insert_inherits_preceding_style() {
        let mut list = StyleRunList::new(6);
        list.apply(StyleId(3), 0, 3);
        list.insert(3, 2);
        assert_eq!(list.total_length(), 8);
        assert_eq!(list.style_at(3), StyleId(3));
        assert_eq!(list.style_at(4), StyleId(3));
        assert_eq!(list.style_at(5), StyleId::DEFAULT);
    }

    #[test]
    fn test_split_and_append_round_trip() {
        let mut list = StyleRunList::new(10);
        list.apply(StyleId(1), 2, 6);
        let reference = list.clone();
        let tail = list.split_off(4);
        assert_eq!(list.total_length(), 4);
        assert_eq!(tail.total_length(), 6);
        assert_eq!(tail.style_at(0), StyleId(1));
        list.append(&tail);
        assert_eq!(list, reference);
    }
}
