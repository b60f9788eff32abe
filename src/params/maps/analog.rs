//! Analog synth tone.

use crate::params::block::BlockLayout;
use crate::params::parameter::Parameter;

const ANALOG_TONE: &[Parameter] = &[
    Parameter::direct("LFO Shape", 0x0D, 0, 5, 0),
    Parameter::direct("LFO Rate", 0x0E, 0, 127, 53),
    Parameter::direct("LFO Fade Time", 0x0F, 0, 127, 0),
    Parameter::switch("LFO Tempo Sync Switch", 0x10, false),
    Parameter::direct("LFO Tempo Sync Note", 0x11, 0, 19, 17),
    Parameter::signed("LFO Pitch Depth", 0x12, -63, 63, 0),
    Parameter::signed("LFO Filter Depth", 0x13, -63, 63, 0),
    Parameter::signed("LFO Amp Depth", 0x14, -63, 63, 0),
    Parameter::switch("LFO Key Trigger", 0x15, true),
    Parameter::direct("OSC Waveform", 0x16, 0, 2, 0),
    Parameter::signed("OSC Pitch Coarse", 0x17, -24, 24, 0),
    Parameter::signed("OSC Pitch Fine", 0x18, -50, 50, 0),
    Parameter::direct("OSC Pulse Width", 0x19, 0, 127, 0),
    Parameter::direct("OSC Pulse Width Mod Depth", 0x1A, 0, 127, 0),
    Parameter::signed("OSC Pitch Env Velocity Sens", 0x1B, -63, 63, 0),
    Parameter::direct("OSC Pitch Env Attack Time", 0x1C, 0, 127, 0),
    Parameter::direct("OSC Pitch Env Decay", 0x1D, 0, 127, 0),
    Parameter::signed("OSC Pitch Env Depth", 0x1E, -63, 63, 0),
    Parameter::direct("Sub Oscillator Type", 0x1F, 0, 2, 0),
    Parameter::switch("Filter Switch", 0x20, true),
    Parameter::direct("Filter Cutoff", 0x21, 0, 127, 127),
    Parameter::signed_by_10("Filter Cutoff Keyfollow", 0x22, -100, 100, 0),
    Parameter::direct("Filter Resonance", 0x23, 0, 127, 0),
    Parameter::signed("Filter Env Velocity Sens", 0x24, -63, 63, 0),
    Parameter::direct("Filter Env Attack Time", 0x25, 0, 127, 0),
    Parameter::direct("Filter Env Decay Time", 0x26, 0, 127, 36),
    Parameter::direct("Filter Env Sustain Level", 0x27, 0, 127, 0),
    Parameter::direct("Filter Env Release Time", 0x28, 0, 127, 0),
    Parameter::signed("Filter Env Depth", 0x29, -63, 63, 0),
    Parameter::direct("AMP Level", 0x2A, 0, 127, 127),
    Parameter::signed_by_10("AMP Level Keyfollow", 0x2B, -100, 100, 0),
    Parameter::signed("AMP Level Velocity Sens", 0x2C, -63, 63, 0),
    Parameter::direct("AMP Env Attack Time", 0x2D, 0, 127, 0),
    Parameter::direct("AMP Env Decay Time", 0x2E, 0, 127, 0),
    Parameter::direct("AMP Env Sustain Level", 0x2F, 0, 127, 127),
    Parameter::direct("AMP Env Release Time", 0x30, 0, 127, 0),
    Parameter::switch("Portamento Switch", 0x31, false),
    Parameter::direct("Portamento Time", 0x32, 0, 127, 0),
    Parameter::switch("Legato Switch", 0x33, false),
    Parameter::signed("Octave Shift", 0x34, -3, 3, 0),
    Parameter::direct("Pitch Bend Range Up", 0x35, 0, 24, 2),
    Parameter::direct("Pitch Bend Range Down", 0x36, 0, 24, 2),
    Parameter::signed("LFO Pitch Modulation Control", 0x38, -63, 63, 0),
    Parameter::signed("LFO Filter Modulation Control", 0x39, -63, 63, 0),
    Parameter::signed("LFO Amp Modulation Control", 0x3A, -63, 63, 0),
    Parameter::signed("LFO Rate Modulation Control", 0x3B, -63, 63, 0),
];

/// The analog synth part's single tone block.
pub static ANALOG: BlockLayout = BlockLayout {
    name: "Analog Tone",
    length: 0x40,
    sections: &[ANALOG_TONE],
    named: true,
    effect_bias: false,
};
