//! Digital synth tones.
//!
//! Each of the two digital parts has a common block, a modify block and three
//! partial blocks sharing one layout.

use crate::params::block::BlockLayout;
use crate::params::parameter::Parameter;

const DIGITAL_COMMON: &[Parameter] = &[
    Parameter::direct("Tone Level", 0x0C, 0, 127, 100),
    Parameter::switch("Portamento Switch", 0x12, false),
    Parameter::direct("Portamento Time", 0x13, 0, 127, 0),
    Parameter::switch("Mono Switch", 0x14, false),
    Parameter::signed("Octave Shift", 0x15, -3, 3, 0),
    Parameter::direct("Pitch Bend Range Up", 0x16, 0, 24, 2),
    Parameter::direct("Pitch Bend Range Down", 0x17, 0, 24, 2),
    Parameter::switch("Partial 1 Switch", 0x19, true),
    Parameter::switch("Partial 1 Select", 0x1A, true),
    Parameter::switch("Partial 2 Switch", 0x1B, false),
    Parameter::switch("Partial 2 Select", 0x1C, false),
    Parameter::switch("Partial 3 Switch", 0x1D, false),
    Parameter::switch("Partial 3 Select", 0x1E, false),
    Parameter::direct("Ring Switch", 0x1F, 0, 2, 0),
    Parameter::switch("Unison Switch", 0x2E, false),
    Parameter::direct("Portamento Mode", 0x31, 0, 1, 0),
    Parameter::switch("Legato Switch", 0x32, false),
    Parameter::direct("Analog Feel", 0x34, 0, 127, 0),
    Parameter::direct("Wave Shape", 0x35, 0, 127, 0),
    Parameter::direct("Tone Category", 0x36, 0, 127, 0),
    Parameter::direct("Unison Size", 0x3C, 0, 3, 0),
];

const DIGITAL_MODIFY: &[Parameter] = &[
    Parameter::direct("Attack Time Interval Sens", 0x01, 0, 127, 0),
    Parameter::direct("Release Time Interval Sens", 0x02, 0, 127, 0),
    Parameter::direct("Portamento Time Interval Sens", 0x03, 0, 127, 0),
    Parameter::direct("Envelope Loop Mode", 0x04, 0, 2, 0),
    Parameter::direct("Envelope Loop Sync Note", 0x05, 0, 19, 0),
    Parameter::switch("Chromatic Portamento", 0x06, false),
];

const DIGITAL_PARTIAL_OSC: &[Parameter] = &[
    Parameter::direct("OSC Wave", 0x00, 0, 7, 0),
    Parameter::direct("OSC Wave Variation", 0x01, 0, 2, 0),
    Parameter::signed("OSC Pitch", 0x03, -24, 24, 0),
    Parameter::signed("OSC Detune", 0x04, -50, 50, 0),
    Parameter::direct("OSC Pulse Width Mod Depth", 0x05, 0, 127, 0),
    Parameter::direct("OSC Pulse Width", 0x06, 0, 127, 0),
    Parameter::direct("OSC Pitch Env Attack Time", 0x07, 0, 127, 0),
    Parameter::direct("OSC Pitch Env Decay", 0x08, 0, 127, 0),
    Parameter::signed("OSC Pitch Env Depth", 0x09, -63, 63, 0),
];

const DIGITAL_PARTIAL_FILTER: &[Parameter] = &[
    Parameter::direct("Filter Mode", 0x0A, 0, 7, 1),
    Parameter::direct("Filter Slope", 0x0B, 0, 1, 0),
    Parameter::direct("Filter Cutoff", 0x0C, 0, 127, 127),
    Parameter::signed_by_10("Filter Cutoff Keyfollow", 0x0D, -100, 100, 0),
    Parameter::signed("Filter Env Velocity Sens", 0x0E, -63, 63, 0),
    Parameter::direct("Filter Resonance", 0x0F, 0, 127, 0),
    Parameter::direct("Filter Env Attack Time", 0x10, 0, 127, 0),
    Parameter::direct("Filter Env Decay Time", 0x11, 0, 127, 36),
    Parameter::direct("Filter Env Sustain Level", 0x12, 0, 127, 0),
    Parameter::direct("Filter Env Release Time", 0x13, 0, 127, 0),
    Parameter::signed("Filter Env Depth", 0x14, -63, 63, 0),
];

const DIGITAL_PARTIAL_AMP: &[Parameter] = &[
    Parameter::direct("AMP Level", 0x15, 0, 127, 100),
    Parameter::signed("AMP Level Velocity Sens", 0x16, -63, 63, 0),
    Parameter::direct("AMP Env Attack Time", 0x17, 0, 127, 0),
    Parameter::direct("AMP Env Decay Time", 0x18, 0, 127, 0),
    Parameter::direct("AMP Env Sustain Level", 0x19, 0, 127, 127),
    Parameter::direct("AMP Env Release Time", 0x1A, 0, 127, 0),
    Parameter::signed("Partial Pan", 0x1B, -64, 63, 0),
];

const DIGITAL_PARTIAL_LFO: &[Parameter] = &[
    Parameter::direct("LFO Shape", 0x1C, 0, 5, 0),
    Parameter::direct("LFO Rate", 0x1D, 0, 127, 81),
    Parameter::switch("LFO Tempo Sync Switch", 0x1E, false),
    Parameter::direct("LFO Tempo Sync Note", 0x1F, 0, 19, 17),
    Parameter::direct("LFO Fade Time", 0x20, 0, 127, 0),
    Parameter::switch("LFO Key Trigger", 0x21, false),
    Parameter::signed("LFO Pitch Depth", 0x22, -63, 63, 0),
    Parameter::signed("LFO Filter Depth", 0x23, -63, 63, 0),
    Parameter::signed("LFO Amp Depth", 0x24, -63, 63, 0),
    Parameter::signed("LFO Pan Depth", 0x25, -63, 63, 0),
    Parameter::direct("Modulation LFO Shape", 0x26, 0, 5, 0),
    Parameter::direct("Modulation LFO Rate", 0x27, 0, 127, 80),
    Parameter::switch("Modulation LFO Tempo Sync Switch", 0x28, false),
    Parameter::direct("Modulation LFO Tempo Sync Note", 0x29, 0, 19, 17),
    Parameter::direct("OSC Pulse Width Shift", 0x2A, 0, 127, 127),
    Parameter::signed("Modulation LFO Pitch Depth", 0x2C, -63, 63, 0),
    Parameter::signed("Modulation LFO Filter Depth", 0x2D, -63, 63, 0),
    Parameter::signed("Modulation LFO Amp Depth", 0x2E, -63, 63, 0),
    Parameter::signed("Modulation LFO Pan Depth", 0x2F, -63, 63, 0),
];

const DIGITAL_PARTIAL_EXTRA: &[Parameter] = &[
    Parameter::signed("Cutoff Aftertouch Sens", 0x30, -63, 63, 0),
    Parameter::signed("Level Aftertouch Sens", 0x31, -63, 63, 0),
    Parameter::direct("Wave Gain", 0x34, 0, 3, 1),
    Parameter::wide("Wave Number", 0x35, 0, 16384, 0),
    Parameter::direct("HPF Cutoff", 0x39, 0, 127, 0),
    Parameter::direct("Super Saw Detune", 0x3A, 0, 127, 0),
    Parameter::signed("Modulation LFO Rate Control", 0x3B, -63, 63, 0),
    Parameter::signed_by_10("AMP Level Keyfollow", 0x3C, -100, 100, 0),
];

/// Common block of a digital synth tone.
pub static DIGITAL_COMMON_LAYOUT: BlockLayout = BlockLayout {
    name: "Digital Common",
    length: 0x40,
    sections: &[DIGITAL_COMMON],
    named: true,
    effect_bias: false,
};

/// Modify block of a digital synth tone.
pub static DIGITAL_MODIFY_LAYOUT: BlockLayout = BlockLayout {
    name: "Digital Modify",
    length: 0x25,
    sections: &[DIGITAL_MODIFY],
    named: false,
    effect_bias: false,
};

/// One of the three partials of a digital synth tone.
pub static DIGITAL_PARTIAL_LAYOUT: BlockLayout = BlockLayout {
    name: "Digital Partial",
    length: 0x3D,
    sections: &[
        DIGITAL_PARTIAL_OSC,
        DIGITAL_PARTIAL_FILTER,
        DIGITAL_PARTIAL_AMP,
        DIGITAL_PARTIAL_LFO,
        DIGITAL_PARTIAL_EXTRA,
    ],
    named: false,
    effect_bias: false,
};
