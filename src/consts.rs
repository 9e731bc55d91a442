//! Constants describing the calibration store layout.
//!
//! Offsets are word offsets into the EEPROM image. The calibration groups
//! are addressed relative to a version-dependent group base
//! ([`GROUPS_OFFSET_3_2`] before format 3.3, [`GROUPS_OFFSET_3_3`] after).
//!
//! ## Key Concepts
//!
//! - **Groups**: fixed regions holding piers (1), raw power (2–4), target
//!   powers (5–7) and conformance test limits (8).
//! - **Bins**: compact channel encodings, see [`crate::freq`].
//! - **Masks**: field widths shared by several decoders.

/// Offset of the format version word.
pub const VERSION_OFFSET: u32 = 0x00c1;

/// Group base for format versions before 3.3.
pub const GROUPS_OFFSET_3_2: u32 = 0x0100;
/// Group base for format versions 3.3 and later.
pub const GROUPS_OFFSET_3_3: u32 = 0x0150;

/// Group 1: 11a frequency piers.
pub const GROUP1_OFFSET: u32 = 0x00;
/// Group 2: 11a raw power calibration.
pub const GROUP2_OFFSET: u32 = 0x05;
/// Group 3: 11b raw power calibration.
pub const GROUP3_OFFSET: u32 = 0x37;
/// Group 4: 11g raw power calibration.
pub const GROUP4_OFFSET: u32 = 0x46;
/// Group 5: 11a target powers.
pub const GROUP5_OFFSET: u32 = 0x55;
/// Group 6: 11b target powers.
pub const GROUP6_OFFSET: u32 = 0x65;
/// Group 7: 11g target powers.
pub const GROUP7_OFFSET: u32 = 0x69;
/// Group 8: conformance test limits.
pub const GROUP8_OFFSET: u32 = 0x6f;

/// Regulatory capability word for format versions 4.0 and later.
pub const REG_CAP_OFFSET: u32 = 0x00ca;
/// Regulatory capability word before format 4.0.
pub const REG_CAP_OFFSET_PRE_4_0: u32 = 0x00cf;
/// 11b output/driver bias word before format 3.3.
pub const OB_DB_11B_OFFSET_PRE_3_3: u32 = 0x00ec;
/// 11g output/driver bias word before format 3.3.
pub const OB_DB_11G_OFFSET_PRE_3_3: u32 = 0x00ed;

/// Regulatory capability bit enabling 11a on upgraded hardware.
pub const REG_CAP_EN_KK_NEW_11A: u16 = 0x0800;
/// Regulatory capability bit enabling 11a on upgraded hardware, before 4.0.
pub const REG_CAP_EN_KK_NEW_11A_PRE_4_0: u16 = 0x0100;

/// Reserved bin value for an unused channel slot. Never converted.
pub const CHANNEL_UNUSED: u16 = 0xff;

/// Width mask of a 7-bit frequency bin (before 3.3).
pub const FREQ_MASK: u16 = 0x7f;
/// Width mask of an 8-bit frequency bin (3.3 and later).
pub const FREQ_MASK_3_3: u16 = 0xff;
/// Width mask of a PCDAC code.
pub const PCDAC_MASK: u16 = 0x3f;
/// Width mask of a 6-bit power value.
pub const POWER_MASK: u16 = 0x3f;

/// Maximum number of 11a calibration piers.
pub const NUM_11A_EEPROM_CHANNELS: usize = 10;
/// Number of 2.4 GHz calibration piers for maps 0 and 1.
pub const NUM_2_4_EEPROM_CHANNELS: usize = 3;
/// Maximum number of 2.4 GHz calibration piers for map 2.
pub const NUM_2_4_EEPROM_CHANNELS_2413: usize = 4;
/// Capacity of any pier list.
pub const MAX_PIERS: usize = NUM_11A_EEPROM_CHANNELS;

/// Number of PCDAC intercepts per legacy channel.
pub const NUM_INTERCEPTS: usize = 11;
/// Words per legacy raw power channel group.
pub const LEGACY_WORDS_PER_CHANNEL: usize = 5;
/// Fixed step by which legacy raw power fields are scaled.
pub const PWR_STEP: u16 = 6;

/// Words per XPD (map 1) channel record.
pub const XPD_WORDS_PER_CHANNEL: usize = 5;
/// Number of XPD gain stages addressed by the gain mask.
pub const NUM_XPD_PER_CHANNEL: usize = 4;
/// Points on the high-power XPD stage.
pub const NUM_POINTS_XPD0: usize = 4;
/// Points on the low-power XPD stage.
pub const NUM_POINTS_XPD3: usize = 3;
/// Fixed PCDAC codes of the low-power XPD stage.
pub const XPD3_PCDACS: [u16; NUM_POINTS_XPD3] = [20, 35, 63];

/// Maximum number of pd gain stages per channel.
pub const MAX_NUM_PDGAINS_PER_CHANNEL: usize = 4;
/// Points on the lowest (highest power) pd gain stage.
pub const NUM_POINTS_LAST_PDGAIN: usize = 4;
/// Points on every other pd gain stage.
pub const NUM_POINTS_OTHER_PDGAINS: usize = 3;
/// Delta pairs carried per pd gain stage in a map 2 record.
pub const MAX_VPD_DELTAS: usize = 4;
/// Words occupied by one map 2 channel record, indexed by `pd gains - 1`.
pub const WORDS_FOR_PD_GAINS: [usize; MAX_NUM_PDGAINS_PER_CHANNEL] = [4, 6, 9, 12];
/// Capacity of any expanded gain curve.
pub const MAX_CURVE_POINTS: usize = 4;

/// 11a target power test channels.
pub const NUM_TEST_FREQUENCIES: usize = 8;
/// 11b target power test channels.
pub const NUM_TARGET_POWER_11B: usize = 2;
/// 11g target power test channels.
pub const NUM_TARGET_POWER_11G: usize = 3;

/// Conformance test limits before 3.3.
pub const NUM_CTLS: usize = 16;
/// Conformance test limits from 3.3.
pub const NUM_CTLS_3_3: usize = 32;
/// Band edges per conformance test limit.
pub const NUM_EDGES: usize = 8;
/// Mode bits of a CTL identifier.
pub const CTL_MODE_M: u8 = 0x0f;

/// Number of spur mitigation channel pairs (5.3 and later).
pub const AR_EEPROM_MODAL_SPURS: usize = 5;
/// Antenna control fields per modal section.
pub const NUM_ANTENNA_CONTROLS: usize = 11;

/// Default gainI before 3.4.
pub const GAIN_I_DEFAULT: u8 = 10;
/// Default scaled OFDM/CCK power delta before 3.4.
pub const TENX_OFDM_CCK_DELTA_INIT: u8 = 15;
/// Default scaled channel 14 CCK filter delta before 4.6.
pub const TENX_CH14_FILTER_CCK_DELTA_INIT: u8 = 15;
/// Default CCK/OFDM gain delta before 4.2.
pub const CCK_OFDM_GAIN_DELTA: u8 = 15;

/// Fixed 11b pier list for map 0.
pub const CHANNELS_11B: [u16; NUM_2_4_EEPROM_CHANNELS] = [2412, 2447, 2484];
/// Fixed 11g pier list for map 0.
pub const CHANNELS_11G: [u16; NUM_2_4_EEPROM_CHANNELS] = [2312, 2412, 2484];
