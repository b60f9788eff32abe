//! Program-level blocks: arpeggio, vocal effects and the four effect slots.

use crate::params::block::BlockLayout;
use crate::params::parameter::Parameter;
use crate::protocol::codec::Encoding;

const ARPEGGIO: &[Parameter] = &[
    Parameter::direct("Arpeggio Grid", 0x01, 0, 8, 4),
    Parameter::direct("Arpeggio Duration", 0x02, 0, 9, 4),
    Parameter::switch("Arpeggio Switch", 0x03, false),
    Parameter::direct("Arpeggio Style", 0x05, 0, 127, 0),
    Parameter::direct("Arpeggio Motif", 0x06, 0, 11, 0),
    Parameter::signed("Arpeggio Octave Range", 0x07, -3, 3, 0),
    // -1 is "off"; the device stores it one above.
    Parameter::new("Arpeggio Key", 0x08, Encoding::OffsetPlus1, -1, 126, -1),
    Parameter::direct("Arpeggio Accent Rate", 0x09, 0, 100, 0),
    Parameter::direct("Arpeggio Velocity", 0x0A, 0, 127, 0),
];

const VOCAL_EFFECTS: &[Parameter] = &[
    Parameter::direct("Level", 0x00, 0, 127, 127),
    Parameter::signed("Pan", 0x01, -64, 63, 0),
    Parameter::direct("Delay Send Level", 0x02, 0, 127, 0),
    Parameter::direct("Reverb Send Level", 0x03, 0, 127, 0),
    Parameter::direct("Output Assign", 0x04, 0, 4, 0),
    Parameter::switch("Auto Pitch Switch", 0x05, false),
    Parameter::direct("Auto Pitch Type", 0x06, 0, 3, 0),
    Parameter::direct("Auto Pitch Scale", 0x07, 0, 1, 0),
    Parameter::direct("Auto Pitch Key", 0x08, 0, 23, 0),
    Parameter::direct("Auto Pitch Note", 0x09, 0, 11, 0),
    Parameter::new("Auto Pitch Gender", 0x0A, Encoding::OffsetPlus10, -10, 10, 0),
    Parameter::signed("Auto Pitch Octave", 0x0B, -1, 1, 0),
    Parameter::direct("Auto Pitch Balance", 0x0C, 0, 100, 100),
    Parameter::switch("Vocoder Switch", 0x0D, false),
    Parameter::direct("Vocoder Envelope", 0x0E, 0, 2, 1),
    Parameter::direct("Vocoder Level", 0x0F, 0, 127, 127),
    Parameter::direct("Vocoder Mic Sens", 0x10, 0, 127, 64),
    Parameter::direct("Vocoder Synth Level", 0x11, 0, 127, 127),
    Parameter::direct("Vocoder Mic Mix Level", 0x12, 0, 127, 0),
    Parameter::direct("Vocoder Mic HPF", 0x13, 0, 13, 0),
];

const EFFECT_1_HEAD: &[Parameter] = &[
    Parameter::direct("Effect Type", 0x00, 0, 4, 0),
    Parameter::direct("Effect Level", 0x01, 0, 127, 127),
    Parameter::direct("Delay Send Level", 0x02, 0, 127, 0),
    Parameter::direct("Reverb Send Level", 0x03, 0, 127, 0),
    Parameter::direct("Output Assign", 0x04, 0, 1, 0),
];

const EFFECT_2_HEAD: &[Parameter] = &[
    Parameter::direct("Effect Type", 0x00, 0, 8, 0),
    Parameter::direct("Effect Level", 0x01, 0, 127, 127),
    Parameter::direct("Delay Send Level", 0x02, 0, 127, 0),
    Parameter::direct("Reverb Send Level", 0x03, 0, 127, 0),
];

/// Effect parameter `n` (1-based), four nibble bytes from `$first + 4(n-1)`.
macro_rules! fx_param {
    ($prefix:literal, $first:expr, $n:literal, $min:expr, $max:expr) => {
        Parameter::wide(
            concat!($prefix, " Parameter ", $n),
            $first + 4 * ($n - 1),
            $min,
            $max,
            0,
        )
    };
}

/// 32 signed effect parameters starting at 0x11.
const EFFECT_PARAMETERS: &[Parameter] = &[
    fx_param!("Effect", 0x11, 1, -20000, 20000),
    fx_param!("Effect", 0x11, 2, -20000, 20000),
    fx_param!("Effect", 0x11, 3, -20000, 20000),
    fx_param!("Effect", 0x11, 4, -20000, 20000),
    fx_param!("Effect", 0x11, 5, -20000, 20000),
    fx_param!("Effect", 0x11, 6, -20000, 20000),
    fx_param!("Effect", 0x11, 7, -20000, 20000),
    fx_param!("Effect", 0x11, 8, -20000, 20000),
    fx_param!("Effect", 0x11, 9, -20000, 20000),
    fx_param!("Effect", 0x11, 10, -20000, 20000),
    fx_param!("Effect", 0x11, 11, -20000, 20000),
    fx_param!("Effect", 0x11, 12, -20000, 20000),
    fx_param!("Effect", 0x11, 13, -20000, 20000),
    fx_param!("Effect", 0x11, 14, -20000, 20000),
    fx_param!("Effect", 0x11, 15, -20000, 20000),
    fx_param!("Effect", 0x11, 16, -20000, 20000),
    fx_param!("Effect", 0x11, 17, -20000, 20000),
    fx_param!("Effect", 0x11, 18, -20000, 20000),
    fx_param!("Effect", 0x11, 19, -20000, 20000),
    fx_param!("Effect", 0x11, 20, -20000, 20000),
    fx_param!("Effect", 0x11, 21, -20000, 20000),
    fx_param!("Effect", 0x11, 22, -20000, 20000),
    fx_param!("Effect", 0x11, 23, -20000, 20000),
    fx_param!("Effect", 0x11, 24, -20000, 20000),
    fx_param!("Effect", 0x11, 25, -20000, 20000),
    fx_param!("Effect", 0x11, 26, -20000, 20000),
    fx_param!("Effect", 0x11, 27, -20000, 20000),
    fx_param!("Effect", 0x11, 28, -20000, 20000),
    fx_param!("Effect", 0x11, 29, -20000, 20000),
    fx_param!("Effect", 0x11, 30, -20000, 20000),
    fx_param!("Effect", 0x11, 31, -20000, 20000),
    fx_param!("Effect", 0x11, 32, -20000, 20000),
];

const DELAY: &[Parameter] = &[
    Parameter::direct("Delay Level", 0x01, 0, 127, 100),
    Parameter::direct("Delay Reverb Send Level", 0x03, 0, 127, 0),
    fx_param!("Delay", 0x04, 1, 0, 65535),
    fx_param!("Delay", 0x04, 2, 0, 65535),
    fx_param!("Delay", 0x04, 3, 0, 65535),
    fx_param!("Delay", 0x04, 4, 0, 65535),
    fx_param!("Delay", 0x04, 5, 0, 65535),
    fx_param!("Delay", 0x04, 6, 0, 65535),
    fx_param!("Delay", 0x04, 7, 0, 65535),
    fx_param!("Delay", 0x04, 8, 0, 65535),
    fx_param!("Delay", 0x04, 9, 0, 65535),
    fx_param!("Delay", 0x04, 10, 0, 65535),
    fx_param!("Delay", 0x04, 11, 0, 65535),
    fx_param!("Delay", 0x04, 12, 0, 65535),
    fx_param!("Delay", 0x04, 13, 0, 65535),
    fx_param!("Delay", 0x04, 14, 0, 65535),
    fx_param!("Delay", 0x04, 15, 0, 65535),
    fx_param!("Delay", 0x04, 16, 0, 65535),
    fx_param!("Delay", 0x04, 17, 0, 65535),
    fx_param!("Delay", 0x04, 18, 0, 65535),
    fx_param!("Delay", 0x04, 19, 0, 65535),
    fx_param!("Delay", 0x04, 20, 0, 65535),
    fx_param!("Delay", 0x04, 21, 0, 65535),
    fx_param!("Delay", 0x04, 22, 0, 65535),
    fx_param!("Delay", 0x04, 23, 0, 65535),
    fx_param!("Delay", 0x04, 24, 0, 65535),
];

const REVERB: &[Parameter] = &[
    Parameter::direct("Reverb Level", 0x01, 0, 127, 100),
    fx_param!("Reverb", 0x03, 1, 0, 65535),
    fx_param!("Reverb", 0x03, 2, 0, 65535),
    fx_param!("Reverb", 0x03, 3, 0, 65535),
    fx_param!("Reverb", 0x03, 4, 0, 65535),
    fx_param!("Reverb", 0x03, 5, 0, 65535),
    fx_param!("Reverb", 0x03, 6, 0, 65535),
    fx_param!("Reverb", 0x03, 7, 0, 65535),
    fx_param!("Reverb", 0x03, 8, 0, 65535),
    fx_param!("Reverb", 0x03, 9, 0, 65535),
    fx_param!("Reverb", 0x03, 10, 0, 65535),
    fx_param!("Reverb", 0x03, 11, 0, 65535),
    fx_param!("Reverb", 0x03, 12, 0, 65535),
    fx_param!("Reverb", 0x03, 13, 0, 65535),
    fx_param!("Reverb", 0x03, 14, 0, 65535),
    fx_param!("Reverb", 0x03, 15, 0, 65535),
    fx_param!("Reverb", 0x03, 16, 0, 65535),
    fx_param!("Reverb", 0x03, 17, 0, 65535),
    fx_param!("Reverb", 0x03, 18, 0, 65535),
    fx_param!("Reverb", 0x03, 19, 0, 65535),
    fx_param!("Reverb", 0x03, 20, 0, 65535),
    fx_param!("Reverb", 0x03, 21, 0, 65535),
    fx_param!("Reverb", 0x03, 22, 0, 65535),
    fx_param!("Reverb", 0x03, 23, 0, 65535),
    fx_param!("Reverb", 0x03, 24, 0, 65535),
];

/// Program arpeggio settings.
pub static ARPEGGIO_LAYOUT: BlockLayout = BlockLayout {
    name: "Arpeggio",
    length: 0x0C,
    sections: &[ARPEGGIO],
    named: false,
    effect_bias: false,
};

/// Vocoder and auto-pitch settings.
pub static VOCAL_EFFECTS_LAYOUT: BlockLayout = BlockLayout {
    name: "Vocal Effects",
    length: 0x18,
    sections: &[VOCAL_EFFECTS],
    named: false,
    effect_bias: false,
};

/// Effect slot 1 (distortion/compressor family).
pub static EFFECT_1_LAYOUT: BlockLayout = BlockLayout {
    name: "Effect 1",
    length: 145,
    sections: &[EFFECT_1_HEAD, EFFECT_PARAMETERS],
    named: false,
    effect_bias: true,
};

/// Effect slot 2 (modulation family).
pub static EFFECT_2_LAYOUT: BlockLayout = BlockLayout {
    name: "Effect 2",
    length: 145,
    sections: &[EFFECT_2_HEAD, EFFECT_PARAMETERS],
    named: false,
    effect_bias: true,
};

/// Delay slot.
pub static DELAY_LAYOUT: BlockLayout = BlockLayout {
    name: "Delay",
    length: 100,
    sections: &[DELAY],
    named: false,
    effect_bias: false,
};

/// Reverb slot.
pub static REVERB_LAYOUT: BlockLayout = BlockLayout {
    name: "Reverb",
    length: 99,
    sections: &[REVERB],
    named: false,
    effect_bias: false,
};
