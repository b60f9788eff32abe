//! Display labels for enumerated parameters.
//!
//! This is a side table for display only. The codec never consults it, so a
//! missing or wrong label cannot change a stored value.

use super::block::BlockLayout;
use super::parameter::Parameter;

const LFO_SHAPES: &[&str] = &["TRI", "SIN", "SAW", "SQR", "S&H", "RND"];
const SYNC_NOTES: &[&str] = &[
    "16", "12", "8", "4", "2", "1", "3/4", "2/3", "1/2", "3/8", "1/3", "1/4", "3/16", "1/6",
    "1/8", "3/32", "1/12", "1/16", "1/24", "1/32",
];
const OFF_ON: &[&str] = &["OFF", "ON"];
const OUTPUT_ASSIGN: &[&str] = &["EFX1", "EFX2", "DLY", "REV", "DIR"];

/// `(layout name or "*", parameter name, labels)`; labels are indexed by
/// `value - min`.
const LABELS: &[(&str, &str, &[&str])] = &[
    ("*", "LFO Shape", LFO_SHAPES),
    ("*", "Modulation LFO Shape", LFO_SHAPES),
    ("*", "LFO Tempo Sync Note", SYNC_NOTES),
    ("*", "Modulation LFO Tempo Sync Note", SYNC_NOTES),
    ("*", "Envelope Loop Sync Note", SYNC_NOTES),
    ("Analog Tone", "OSC Waveform", &["SAW", "TRI", "PW-SQR"]),
    ("Analog Tone", "Sub Oscillator Type", &["OFF", "OCT-1", "OCT-2"]),
    ("Analog Tone", "Filter Switch", &["BYPASS", "LPF"]),
    (
        "Digital Partial",
        "OSC Wave",
        &["SAW", "SQR", "PW-SQR", "TRI", "SINE", "NOISE", "SUPER-SAW", "PCM"],
    ),
    ("Digital Partial", "OSC Wave Variation", &["A", "B", "C"]),
    (
        "Digital Partial",
        "Filter Mode",
        &["BYPASS", "LPF", "HPF", "BPF", "PKG", "LPF2", "LPF3", "LPF4"],
    ),
    ("Digital Partial", "Filter Slope", &["-12dB", "-24dB"]),
    ("Digital Partial", "Wave Gain", &["-6dB", "0dB", "+6dB", "+12dB"]),
    ("Digital Common", "Ring Switch", &["OFF", "---", "ON"]),
    ("Digital Common", "Portamento Mode", &["NORMAL", "LEGATO"]),
    ("Digital Common", "Unison Size", &["2", "4", "6", "8"]),
    ("Digital Modify", "Envelope Loop Mode", &["OFF", "FREE-RUN", "TEMPO-SYNC"]),
    ("Drum Pad", "Assign Type", &["MULTI", "SINGLE"]),
    ("Drum Pad", "Partial Env Mode", &["NO-SUS", "SUSTAIN"]),
    ("Drum Pad", "Partial Output Assign", OUTPUT_ASSIGN),
    ("Drum Pad", "WMT Velocity Control", &["OFF", "ON", "RANDOM"]),
    ("Drum Pad", "TVF Filter Type", &["OFF", "LPF", "BPF", "HPF", "PKG", "LPF2", "LPF3"]),
    (
        "Arpeggio",
        "Arpeggio Grid",
        &["04_", "08_", "08L", "08H", "08t", "16_", "16L", "16H", "16t"],
    ),
    (
        "Arpeggio",
        "Arpeggio Duration",
        &["30", "40", "50", "60", "70", "80", "90", "100", "120", "FUL"],
    ),
    (
        "Arpeggio",
        "Arpeggio Motif",
        &[
            "UP/L", "UP/H", "UP/_", "dn/L", "dn/H", "dn/_", "Ud/L", "Ud/H", "Ud/_", "rn/L",
            "rn/_", "PHRASE",
        ],
    ),
    ("Vocal Effects", "Output Assign", OUTPUT_ASSIGN),
    ("Vocal Effects", "Auto Pitch Type", &["SOFT", "HARD", "ELECTRIC1", "ELECTRIC2"]),
    ("Vocal Effects", "Auto Pitch Scale", &["CHROMATIC", "Maj(Min)"]),
    (
        "Vocal Effects",
        "Auto Pitch Note",
        &["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"],
    ),
    ("Vocal Effects", "Vocoder Envelope", &["SHARP", "SOFT", "LONG"]),
    (
        "Effect 1",
        "Effect Type",
        &["Thru", "DISTORTION", "FUZZ", "COMPRESSOR", "BIT CRUSHER"],
    ),
    ("Effect 1", "Output Assign", &["DIR", "EFX2"]),
    (
        "Effect 2",
        "Effect Type",
        &["OFF", "", "", "", "", "FLANGER", "PHASER", "RING MOD", "SLICER"],
    ),
];

/// The label table for `param` in `layout`, if it is enumerated.
pub fn labels(layout: &BlockLayout, param: &Parameter) -> Option<&'static [&'static str]> {
    LABELS
        .iter()
        .find(|(scope, name, _)| *name == param.name && *scope == layout.name)
        .or_else(|| {
            LABELS
                .iter()
                .find(|(scope, name, _)| *name == param.name && *scope == "*")
        })
        .map(|(_, _, labels)| *labels)
        .or_else(|| {
            // Plain switches read as OFF/ON.
            (param.min == 0 && param.max == 1 && param.name.contains("Switch")).then_some(OFF_ON)
        })
}

/// Display label of `value`, if the parameter is enumerated and the value
/// has one.
pub fn label(layout: &BlockLayout, param: &Parameter, value: i32) -> Option<&'static str> {
    let index = usize::try_from(value - param.min).ok()?;
    labels(layout, param)?
        .get(index)
        .copied()
        .filter(|label| !label.is_empty())
}
