/// Decimal section numbering across heading depths 2..=6.
///
/// Only three numbers are tracked: depth 2 owns the first, depth 3 the
/// second, and every depth from 4 to 6 shares the third. A depth-5 heading
/// therefore gets a tag shaped like a depth-4 one (`1.2.3`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionCounter {
    top: u32,
    mid: u32,
    sub: u32,
    last_depth: u8,
}

impl Default for SectionCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionCounter {
    /// Counter positioned on the intro section (`0`).
    #[must_use]
    pub fn new() -> Self {
        Self {
            top: 0,
            mid: 1,
            sub: 1,
            last_depth: 2,
        }
    }

    /// Consume one heading and return its label, e.g. `"2"`, `"2.1"`,
    /// `"2.1.3"`.
    ///
    /// A depth-4+ heading that arrives before any depth-3 heading of the
    /// current top-level section is numbered under `mid` 1 and continues the
    /// third component left over from the previous section; only depth 3
    /// resets it.
    pub fn advance(&mut self, depth: u8) -> String {
        let label = match depth {
            0..=2 => {
                self.top += 1;
                self.mid = 1;
                format!("{}", self.top)
            }
            3 => {
                if self.last_depth >= 3 {
                    self.mid += 1;
                }
                self.sub = 1;
                format!("{}.{}", self.top, self.mid)
            }
            _ => {
                if self.last_depth >= depth {
                    self.sub += 1;
                }
                format!("{}.{}.{}", self.top, self.mid, self.sub)
            }
        };
        self.last_depth = depth;
        label
    }

    /// Full display line: indentation, label, heading text.
    pub fn line(&mut self, depth: u8, text: &str, indent_unit: &str) -> String {
        let indent = indent_unit.repeat(usize::from(depth.saturating_sub(1)));
        let label = self.advance(depth);
        format!("{indent}{label} {text}")
    }
}
