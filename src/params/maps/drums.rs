//! Drum kit.
//!
//! The kit has one common block and 38 pad blocks. A pad payload is 195
//! bytes, so it spills from its LO register into its HI register; offsets
//! here are linear payload offsets (0..195).

use crate::params::block::BlockLayout;
use crate::params::parameter::Parameter;

const DRUM_COMMON: &[Parameter] = &[Parameter::direct("Kit Level", 0x0C, 0, 127, 127)];

const DRUM_PAD_HEAD: &[Parameter] = &[
    Parameter::direct("Assign Type", 12, 0, 1, 0),
    Parameter::direct("Mute Group", 13, 0, 31, 0),
    Parameter::direct("Partial Level", 14, 0, 127, 127),
    Parameter::direct("Partial Coarse Tune", 15, 0, 127, 60),
    Parameter::signed("Partial Fine Tune", 16, -50, 50, 0),
    Parameter::direct("Partial Random Pitch Depth", 17, 0, 30, 0),
    Parameter::signed("Partial Pan", 18, -64, 63, 0),
    Parameter::direct("Partial Random Pan Depth", 19, 0, 63, 0),
    Parameter::signed("Partial Alternate Pan Depth", 20, -63, 63, 0),
    Parameter::direct("Partial Env Mode", 21, 0, 1, 1),
    Parameter::direct("Partial Output Level", 22, 0, 127, 127),
    Parameter::direct("Partial Chorus Send Level", 25, 0, 127, 0),
    Parameter::direct("Partial Reverb Send Level", 26, 0, 127, 0),
    Parameter::direct("Partial Output Assign", 27, 0, 4, 0),
    Parameter::direct("Partial Pitch Bend Range", 28, 0, 48, 2),
    Parameter::switch("Partial Receive Expression", 29, true),
    Parameter::switch("Partial Receive Hold-1", 30, false),
    Parameter::direct("WMT Velocity Control", 32, 0, 2, 1),
];

/// One wave-mix-table layer: 29 consecutive bytes starting at `$base`.
macro_rules! wmt_layer {
    ($n:literal, $base:expr) => {
        &[
            Parameter::switch(concat!("WMT", $n, " Wave Switch"), $base, false),
            Parameter::direct(concat!("WMT", $n, " Wave Group Type"), $base + 1, 0, 0, 0),
            Parameter::wide(concat!("WMT", $n, " Wave Group ID"), $base + 2, 0, 16384, 0),
            Parameter::wide(concat!("WMT", $n, " Wave Number L"), $base + 6, 0, 16384, 0),
            Parameter::wide(concat!("WMT", $n, " Wave Number R"), $base + 10, 0, 16384, 0),
            Parameter::direct(concat!("WMT", $n, " Wave Gain"), $base + 14, 0, 3, 1),
            Parameter::switch(concat!("WMT", $n, " Wave FXM Switch"), $base + 15, false),
            Parameter::direct(concat!("WMT", $n, " Wave FXM Color"), $base + 16, 0, 3, 0),
            Parameter::direct(concat!("WMT", $n, " Wave FXM Depth"), $base + 17, 0, 16, 0),
            Parameter::switch(concat!("WMT", $n, " Wave Tempo Sync"), $base + 18, false),
            Parameter::signed(concat!("WMT", $n, " Wave Coarse Tune"), $base + 19, -48, 48, 0),
            Parameter::signed(concat!("WMT", $n, " Wave Fine Tune"), $base + 20, -50, 50, 0),
            Parameter::signed(concat!("WMT", $n, " Wave Pan"), $base + 21, -64, 63, 0),
            Parameter::switch(concat!("WMT", $n, " Wave Random Pan Switch"), $base + 22, false),
            Parameter::direct(concat!("WMT", $n, " Wave Alternate Pan Switch"), $base + 23, 0, 2, 0),
            Parameter::direct(concat!("WMT", $n, " Wave Level"), $base + 24, 0, 127, 127),
            Parameter::direct(concat!("WMT", $n, " Velocity Range Lower"), $base + 25, 1, 127, 1),
            Parameter::direct(concat!("WMT", $n, " Velocity Range Upper"), $base + 26, 1, 127, 127),
            Parameter::direct(concat!("WMT", $n, " Velocity Fade Width Lower"), $base + 27, 0, 127, 0),
            Parameter::direct(concat!("WMT", $n, " Velocity Fade Width Upper"), $base + 28, 0, 127, 0),
        ]
    };
}

const WMT1: &[Parameter] = wmt_layer!(1, 33);
const WMT2: &[Parameter] = wmt_layer!(2, 62);
const WMT3: &[Parameter] = wmt_layer!(3, 91);
const WMT4: &[Parameter] = wmt_layer!(4, 120);

const DRUM_PAD_PITCH_ENV: &[Parameter] = &[
    Parameter::signed("Pitch Env Depth", 149, -12, 12, 0),
    Parameter::signed("Pitch Env Velocity Sens", 150, -63, 63, 0),
    Parameter::signed("Pitch Env Time 1 Velocity Sens", 151, -63, 63, 0),
    Parameter::signed("Pitch Env Time 4 Velocity Sens", 152, -63, 63, 0),
    Parameter::direct("Pitch Env Time 1", 153, 0, 127, 0),
    Parameter::direct("Pitch Env Time 2", 154, 0, 127, 0),
    Parameter::direct("Pitch Env Time 3", 155, 0, 127, 0),
    Parameter::direct("Pitch Env Time 4", 156, 0, 127, 0),
    Parameter::signed("Pitch Env Level 0", 157, -63, 63, 0),
    Parameter::signed("Pitch Env Level 1", 158, -63, 63, 0),
    Parameter::signed("Pitch Env Level 2", 159, -63, 63, 0),
    Parameter::signed("Pitch Env Level 3", 160, -63, 63, 0),
    Parameter::signed("Pitch Env Level 4", 161, -63, 63, 0),
];

const DRUM_PAD_TVF: &[Parameter] = &[
    Parameter::direct("TVF Filter Type", 162, 0, 6, 1),
    Parameter::direct("TVF Cutoff Frequency", 163, 0, 127, 127),
    Parameter::direct("TVF Cutoff Velocity Curve", 164, 0, 7, 0),
    Parameter::signed("TVF Cutoff Velocity Sens", 165, -63, 63, 0),
    Parameter::direct("TVF Resonance", 166, 0, 127, 0),
    Parameter::signed("TVF Resonance Velocity Sens", 167, -63, 63, 0),
    Parameter::signed("TVF Env Depth", 168, -63, 63, 0),
    Parameter::direct("TVF Env Velocity Curve Type", 169, 0, 7, 0),
    Parameter::signed("TVF Env Velocity Sens", 170, -63, 63, 0),
    Parameter::direct("TVF Env Time 1", 171, 0, 127, 0),
    Parameter::direct("TVF Env Time 2", 172, 0, 127, 0),
    Parameter::direct("TVF Env Time 3", 173, 0, 127, 0),
    Parameter::direct("TVF Env Time 4", 174, 0, 127, 0),
    Parameter::direct("TVF Env Level 0", 175, 0, 127, 0),
    Parameter::direct("TVF Env Level 1", 176, 0, 127, 127),
    Parameter::direct("TVF Env Level 2", 177, 0, 127, 127),
    Parameter::direct("TVF Env Level 3", 178, 0, 127, 127),
    Parameter::direct("TVF Env Level 4", 179, 0, 127, 0),
];

const DRUM_PAD_TVA: &[Parameter] = &[
    Parameter::direct("TVA Level Velocity Curve", 180, 0, 7, 0),
    Parameter::signed("TVA Level Velocity Sens", 181, -63, 63, 0),
    Parameter::signed("TVA Env Time 1 Velocity Sens", 182, -63, 63, 0),
    Parameter::signed("TVA Env Time 4 Velocity Sens", 183, -63, 63, 0),
    Parameter::direct("TVA Env Time 1", 184, 0, 127, 0),
    Parameter::direct("TVA Env Time 2", 185, 0, 127, 0),
    Parameter::direct("TVA Env Time 3", 186, 0, 127, 0),
    Parameter::direct("TVA Env Time 4", 187, 0, 127, 0),
    Parameter::direct("TVA Env Level 1", 188, 0, 127, 127),
    Parameter::direct("TVA Env Level 2", 189, 0, 127, 127),
    Parameter::direct("TVA Env Level 3", 190, 0, 127, 127),
    Parameter::switch("One Shot Mode", 191, false),
    Parameter::signed("Relative Level", 192, -64, 63, 0),
];

/// Kit-wide settings.
pub static DRUM_COMMON_LAYOUT: BlockLayout = BlockLayout {
    name: "Drum Common",
    length: 0x12,
    sections: &[DRUM_COMMON],
    named: true,
    effect_bias: false,
};

/// One drum pad.
pub static DRUM_PAD_LAYOUT: BlockLayout = BlockLayout {
    name: "Drum Pad",
    length: 195,
    sections: &[
        DRUM_PAD_HEAD,
        WMT1,
        WMT2,
        WMT3,
        WMT4,
        DRUM_PAD_PITCH_ENV,
        DRUM_PAD_TVF,
        DRUM_PAD_TVA,
    ],
    named: true,
    effect_bias: false,
};
