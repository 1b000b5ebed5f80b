//! Classic curves and plants, ready to plot.

use crate::config::WhitespacePolicy;
use crate::error::LsysError;
use crate::grammar::{GrammarRecord, GrammarSpec};

const CHARPOV: &str = "https://www.cs.unh.edu/~charpov/programming-lsystems.html";
const BOURKE: &str = "http://paulbourke.net/fractals/lsys/";

/// Every built-in grammar as an unvalidated record, keyed by a short name.
pub fn records() -> Vec<(&'static str, GrammarRecord)> {
    vec![
        (
            "hilbert",
            GrammarRecord::new("Hilbert Curve", 90.0, "X")
                .with_ref(CHARPOV)
                .rule('X', "-YF+XFX+FY-")
                .rule('Y', "+XF-YFY-FX+"),
        ),
        (
            "koch",
            GrammarRecord::new("Koch's Snowflake", 60.0, "+F--F--F")
                .with_ref(CHARPOV)
                .rule('F', "F+F--F+F"),
        ),
        (
            "peano",
            GrammarRecord::new("Peano Curve aka Hilbert II", 90.0, "L")
                .with_ref("http://bl.ocks.org/nitaku/8949471")
                .with_ref("http://mathworld.wolfram.com/HilbertCurve.html")
                .with_order([1, 2, 3, 4])
                .rule('L', "LFRFL-F-RFLFR+F+LFRFL")
                .rule('R', "RFLFR+F+LFRFL-F-RFLFR"),
        ),
        (
            "gosper",
            GrammarRecord::new("Peano-Gosper Curve aka 'Flowsnake'", 60.0, "A")
                .with_ref("https://en.wikipedia.org/wiki/Gosper_curve")
                .with_ref("http://larryriddle.agnesscott.org/ifs/ksnow/flowsnake.htm")
                .with_order([1, 2, 3, 4])
                .rule('A', "A-B--B+A++AA+B-")
                .rule('B', "+A-BB--B-A++A+B")
                .post_rule('A', "F")
                .post_rule('B', "F"),
        ),
        (
            "sierpinski-diamond",
            GrammarRecord::new("Sierpinski Diamond", 90.0, "F+XF+F+XF")
                .with_ref(BOURKE)
                .with_order([2, 3, 4, 5])
                .rule('X', "XF-F+F-XF+F+XF-F+F-X"),
        ),
        (
            "sierpinski-arrowhead",
            GrammarRecord::new("Sierpinski Arrowhead", 60.0, "YF")
                .with_ref(BOURKE)
                .with_order([2, 3, 4, 8])
                .rule('X', "YF+XF+Y")
                .rule('Y', "XF-YF-X"),
        ),
        (
            "sierpinski-square",
            GrammarRecord::new("Sierpinski Square Snowflake", 45.0, "+BABA")
                .with_ref("http://www.ethoberon.ethz.ch/WirthPubl/AD.pdf#page93")
                .with_ref("https://en.wikipedia.org/wiki/Sierpi%C5%84ski_curve")
                .with_ref("http://mathworld.wolfram.com/SierpinskiCurve.html")
                .with_order([1, 2, 3, 4])
                .rule('A', "F--F--")
                .rule('B', "BF+FF+B F--F-- BF+FF+B"),
        ),
        (
            "pentaplexity",
            GrammarRecord::new("Pentaplexity", 36.0, "F++F++F++F++F")
                .with_ref(BOURKE)
                .with_order([1, 2, 3, 4])
                .rule('F', "F++F++F|F-F++F"),
        ),
        (
            "dragon",
            GrammarRecord::new("Dragon Curve", 90.0, "+FX")
                .with_ref(BOURKE)
                .with_order([2, 4, 6, 14])
                .rule('X', "X+YF+")
                .rule('Y', "-FX-Y"),
        ),
        (
            "plant-1",
            GrammarRecord::new("Plant 1", 22.5, "++++X")
                .with_ref(CHARPOV)
                .rule('X', "F+[[X]-X]-F[-FX]+X")
                .rule('F', "FF"),
        ),
        (
            "plant-2",
            GrammarRecord::new("Plant 2", 22.5, "++++F")
                .with_ref(CHARPOV)
                .rule('F', "FF-[-F+F+F]+[+F-F-F]"),
        ),
    ]
}

/// All built-in grammars, validated, in catalog order.
pub fn builtin(whitespace: WhitespacePolicy) -> Result<Vec<GrammarSpec>, LsysError> {
    records()
        .into_iter()
        .map(|(_, record)| record.validate(whitespace))
        .collect()
}

/// Looks up one built-in grammar by its short name (e.g. `"koch"`).
pub fn by_name(name: &str, whitespace: WhitespacePolicy) -> Result<GrammarSpec, LsysError> {
    records()
        .into_iter()
        .find(|(key, _)| *key == name)
        .ok_or_else(|| {
            LsysError::configuration("catalog", format!("no built-in grammar named {name:?}"))
        })?
        .1
        .validate(whitespace)
}

/// Short names of every built-in grammar, in catalog order.
pub fn names() -> Vec<&'static str> {
    records().into_iter().map(|(key, _)| key).collect()
}
