/// Unit suffix of a window token ("7d", "3m", "2y", "6h").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowUnit {
    Hours,
    Days,
    Months,
    Years,
}

impl WindowUnit {
    fn word(self) -> &'static str {
        match self {
            WindowUnit::Hours => "hours",
            WindowUnit::Days => "days",
            WindowUnit::Months => "months",
            WindowUnit::Years => "years",
        }
    }
}

/// A parsed lookback window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowSpec {
    pub amount: u32,
    pub unit: WindowUnit,
}

/// Fallback for tokens that don't parse.
pub const DEFAULT_WINDOW: WindowSpec = WindowSpec {
    amount: 30,
    unit: WindowUnit::Days,
};

impl WindowSpec {
    /// Parse a `<integer><unit>` token. Anything unrecognized falls back to
    /// 30 days rather than erroring, so a bad token still yields a result.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        let Some(unit_char) = token.chars().last() else {
            return DEFAULT_WINDOW;
        };
        let unit = match unit_char {
            'h' => WindowUnit::Hours,
            'd' => WindowUnit::Days,
            'm' => WindowUnit::Months,
            'y' => WindowUnit::Years,
            _ => return DEFAULT_WINDOW,
        };
        match token[..token.len() - 1].parse::<u32>() {
            Ok(amount) if amount > 0 => WindowSpec { amount, unit },
            _ => DEFAULT_WINDOW,
        }
    }

    /// Interval string used in time-series store queries, e.g. "7 days".
    pub fn interval(&self) -> String {
        format!("{} {}", self.amount, self.unit.word())
    }
}
