use colored::{Color, ColoredString, Colorize};

use crate::testing::Verdict;

pub fn is_truecolor_supported() -> bool {
    let Ok(v) = std::env::var("COLORTERM") else {
        return false
    };
    matches!(v.as_str(), "truecolor" | "24bit")
}

pub trait ColorTheme {
    fn color(&self) -> Color;
}

impl ColorTheme for Verdict {
    fn color(&self) -> Color {
        use Verdict::*;
        if !self::is_truecolor_supported() {
            return match self {
                Pass => Color::Green,
                Wrong => Color::Yellow,
                Timeout => Color::Red,
                Crash => Color::Magenta,
                NoProgram => Color::BrightBlack,
            };
        }

        match self {
            Pass => Color::TrueColor {
                r: 30,
                g: 180,
                b: 40,
            },
            Wrong => Color::TrueColor {
                r: 210,
                g: 138,
                b: 4,
            },
            Timeout => Color::TrueColor {
                r: 220,
                g: 42,
                b: 42,
            },
            Crash => Color::TrueColor {
                r: 171,
                g: 40,
                b: 200,
            },
            NoProgram => Color::TrueColor {
                r: 110,
                g: 110,
                b: 110,
            },
        }
    }
}

pub fn verdict_label(verdict: Verdict) -> ColoredString {
    verdict.to_string().color(verdict.color()).bold()
}
