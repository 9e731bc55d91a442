//! Header and modal section decoding.
//!
//! The header carries the per-device mode bits, the antenna gain limits, the
//! offsets of the later calibration sections (4.0 and later) and one modal
//! section per band holding the radio front-end parameters. Its layout moved
//! in format 3.3; both layouts are described by a [`Layout`].

use crate::bits::{Field, Piece, flag, hi8, lo8, signed_byte, take, unpack};
use crate::consts::{
    AR_EEPROM_MODAL_SPURS, CCK_OFDM_GAIN_DELTA, GAIN_I_DEFAULT, NUM_2_4_EEPROM_CHANNELS,
    NUM_ANTENNA_CONTROLS, NUM_CTLS, NUM_CTLS_3_3, OB_DB_11B_OFFSET_PRE_3_3,
    OB_DB_11G_OFFSET_PRE_3_3, REG_CAP_EN_KK_NEW_11A, REG_CAP_EN_KK_NEW_11A_PRE_4_0,
    REG_CAP_OFFSET, REG_CAP_OFFSET_PRE_4_0, TENX_CH14_FILTER_CCK_DELTA_INIT,
    TENX_OFDM_CCK_DELTA_INIT,
};
use crate::error::DecodeError;
use crate::freq::{Band, Spectrum, bin_to_frequency};
use crate::source::{WordReader, WordSource};
use crate::version::{FormatVersion, MapType};
use heapless::Vec;

/// Word offsets of the header sections for one layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Mode bits, device type and turbo power limit.
    pub mode: u32,
    /// Antenna gain limits, followed by the section offsets from 4.0.
    pub antenna_gain: u32,
    /// Start of the modal section of each band, indexed by [`Band::index`].
    pub modal: [u32; 3],
    /// Start of the conformance test limit identifiers.
    pub ctl: u32,
}

impl Layout {
    /// Layout used before format 3.3.
    pub const PRE_3_3: Layout = Layout {
        mode: 0x00c2,
        antenna_gain: 0x00c4,
        modal: [0x00c5, 0x00d0, 0x00da],
        ctl: 0x00e4,
    };

    /// Layout used from format 3.3.
    pub const FROM_3_3: Layout = Layout {
        mode: 0x00c2,
        antenna_gain: 0x00c3,
        modal: [0x00d4, 0x00f2, 0x010d],
        ctl: 0x0128,
    };

    /// Layout for `version`.
    pub const fn for_version(version: FormatVersion) -> &'static Layout {
        if version.raw() >= FormatVersion::V3_3.raw() {
            &Self::FROM_3_3
        } else {
            &Self::PRE_3_3
        }
    }
}

/// Thermal transmit gain adjustment parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct CornerCal {
    /// Clip level.
    pub clip: u8,
    /// PD90 setting.
    pub pd90: u8,
    /// PD84 setting.
    pub pd84: u8,
    /// Gain select.
    pub g_sel: u8,
}

impl Default for CornerCal {
    fn default() -> Self {
        Self {
            clip: 4,
            pd90: 1,
            pd84: 1,
            g_sel: 0,
        }
    }
}

/// IQ calibration coefficients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct IqCal {
    /// In-phase coefficient.
    pub i: u8,
    /// Quadrature coefficient.
    pub q: u8,
}

/// Front-end parameters used in turbo (double-rate) mode, 5.0 and later.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct TurboModal {
    /// Switch settling time.
    pub switch_settling: u8,
    /// Transmit/receive attenuation.
    pub txrx_atten: u8,
    /// Receive/transmit margin.
    pub rxtx_margin: u8,
    /// Desired ADC size.
    pub adc_desired_size: i8,
    /// Desired PGA size.
    pub pga_desired_size: i8,
}

/// The modal section of one band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct ModalHeader {
    /// Switch settling time.
    pub switch_settling: u8,
    /// Transmit/receive attenuation.
    pub txrx_atten: u8,
    /// Antenna switch table.
    pub antenna_control: [u8; NUM_ANTENNA_CONTROLS],
    /// Desired ADC size.
    pub adc_desired_size: i8,
    /// Output bias (11b and 11g only).
    pub ob: u8,
    /// Driver bias (11b and 11g only).
    pub db: u8,
    /// Transmit end to external LNA on.
    pub tx_end_to_xlna_on: u8,
    /// Weak-signal detection threshold.
    pub thresh62: u8,
    /// Transmit end to external PA off.
    pub tx_end_to_xpa_off: u8,
    /// Transmit frame to external PA on.
    pub tx_frame_to_xpa_on: u8,
    /// Desired PGA size.
    pub pga_desired_size: i8,
    /// Noise floor threshold in dBm.
    pub noise_floor_thresh: i16,
    /// External LNA gain.
    pub xlna_gain: u8,
    /// Transmit gain.
    pub xgain: u8,
    /// Transmit power detector select.
    pub xpd: bool,
    /// False detect backoff (3.3 and later).
    pub false_detect_backoff: u8,
    /// Receive gain setting.
    pub gain_i: u8,
    /// Receive/transmit margin (4.1 and later).
    pub rxtx_margin: u8,
    /// Turbo mode parameters (11a and 11g, 5.0 and later).
    pub turbo: Option<TurboModal>,
}

/// Decoded header of a calibration store.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct EepromHeader {
    /// Format version.
    pub version: FormatVersion,
    /// Raw power map type.
    pub map: MapType,
    /// 11a turbo mode disabled.
    pub turbo5_disable: bool,
    /// RF kill switch present.
    pub rf_kill: bool,
    /// Device type.
    pub device_type: u8,
    /// Maximum 5 GHz turbo power.
    pub turbo2w_max_power5: u8,
    /// 11g turbo mode disabled. Always set before 4.0.
    pub turbo2_disable: bool,
    /// 11a enabled.
    pub a_mode: bool,
    /// 11b enabled.
    pub b_mode: bool,
    /// 11g enabled.
    pub g_mode: bool,
    /// Maximum 5 GHz antenna gain.
    pub antenna_gain_max_5: i8,
    /// Maximum 2.4 GHz antenna gain.
    pub antenna_gain_max_2: i8,
    /// 5 GHz extended range disabled (4.0 and later).
    pub disable_xr5: bool,
    /// 2.4 GHz extended range disabled (4.0 and later).
    pub disable_xr2: bool,
    /// Start of the extended attach region (4.0 and later).
    pub ear_start: u16,
    /// Start of the target power section (4.0 and later).
    pub target_powers_start: u16,
    /// 32 kHz sleep crystal fitted (4.0 and later).
    pub exist_32khz_crystal: bool,
    /// Start of the map 2 raw power section (5.0 and later).
    pub map2_power_cal_start: u16,
    /// Modal sections, indexed by [`Band::index`].
    pub modal: [ModalHeader; 3],
    /// 11a output bias per sub-band, `ob1` through `ob4`.
    pub ob_5: [u8; 4],
    /// 11a driver bias per sub-band, `db1` through `db4`.
    pub db_5: [u8; 4],
    /// 2.4 GHz output bias for 11b and 11g.
    pub ob_2ghz: [u8; 2],
    /// 2.4 GHz driver bias for 11b and 11g.
    pub db_2ghz: [u8; 2],
    /// 5 GHz fixed bias (4.0 and later).
    pub fixed_bias5: bool,
    /// 2.4 GHz fixed bias (4.0 and later).
    pub fixed_bias2: bool,
    /// 5 GHz extended range target power (3.3 and later).
    pub xr_target_power5: u8,
    /// 2.4 GHz extended range target power (4.0 and later).
    pub xr_target_power2: u8,
    /// Maximum 2.4 GHz turbo power (4.0 and later).
    pub turbo2w_max_power2: u8,
    /// IQ calibration for 11a and 11g (4.0 and later).
    pub iq_cal: [IqCal; 2],
    /// Scaled OFDM to CCK power delta.
    pub cck_ofdm_pwr_delta: u8,
    /// Scaled channel 14 CCK filter delta.
    pub scaled_ch14_filter_cck_delta: u8,
    /// CCK to OFDM gain delta.
    pub cck_ofdm_gain_delta: u8,
    /// 11b calibration piers in MHz (4.0 and later).
    pub cal_pier_11b: [u16; NUM_2_4_EEPROM_CHANNELS],
    /// 11g calibration piers in MHz (4.0 and later).
    pub cal_pier_11g: [u16; NUM_2_4_EEPROM_CHANNELS],
    /// Conformance test limit identifiers, 16 before 3.3 and 32 after.
    pub ctl_ids: Vec<u8, NUM_CTLS_3_3>,
    /// Spur mitigation channel pairs (5.3 and later).
    pub spur_chans: [[u16; 2]; AR_EEPROM_MODAL_SPURS],
    /// Regulatory capability word.
    pub reg_cap: u16,
    /// Thermal transmit gain adjustment.
    pub corner_cal: CornerCal,
}

impl EepromHeader {
    pub(crate) fn new(version: FormatVersion, map: MapType) -> Self {
        Self {
            version,
            map,
            turbo5_disable: false,
            rf_kill: false,
            device_type: 0,
            turbo2w_max_power5: 0,
            turbo2_disable: true,
            a_mode: false,
            b_mode: false,
            g_mode: false,
            antenna_gain_max_5: 0,
            antenna_gain_max_2: 0,
            disable_xr5: false,
            disable_xr2: false,
            ear_start: 0,
            target_powers_start: 0,
            exist_32khz_crystal: false,
            map2_power_cal_start: 0,
            modal: [ModalHeader::default(); 3],
            ob_5: [0; 4],
            db_5: [0; 4],
            ob_2ghz: [0; 2],
            db_2ghz: [0; 2],
            fixed_bias5: false,
            fixed_bias2: false,
            xr_target_power5: 0,
            xr_target_power2: 0,
            turbo2w_max_power2: 0,
            iq_cal: [IqCal::default(); 2],
            cck_ofdm_pwr_delta: TENX_OFDM_CCK_DELTA_INIT,
            scaled_ch14_filter_cck_delta: TENX_CH14_FILTER_CCK_DELTA_INIT,
            cck_ofdm_gain_delta: CCK_OFDM_GAIN_DELTA,
            cal_pier_11b: [0; NUM_2_4_EEPROM_CHANNELS],
            cal_pier_11g: [0; NUM_2_4_EEPROM_CHANNELS],
            ctl_ids: Vec::new(),
            spur_chans: [[0; 2]; AR_EEPROM_MODAL_SPURS],
            reg_cap: 0,
            corner_cal: CornerCal::default(),
        }
    }

    /// Whether `band` is enabled.
    pub fn band_enabled(&self, band: Band) -> bool {
        match band {
            Band::A => self.a_mode,
            Band::B => self.b_mode,
            Band::G => self.g_mode,
        }
    }

    /// Modal section of `band`.
    pub fn modal(&self, band: Band) -> &ModalHeader {
        &self.modal[band.index()]
    }
}

const SWITCH_SETTLING: Field = &[Piece::new(0, 8, 7)];
const TXRX_ATTEN: Field = &[Piece::new(0, 2, 6)];

/// Antenna switch table, spread over the first five modal words.
const ANTENNA_CONTROL: [Field; NUM_ANTENNA_CONTROLS] = [
    &[Piece::new(0, 0, 2).at(4), Piece::new(1, 12, 4)],
    &[Piece::new(1, 6, 6)],
    &[Piece::new(1, 0, 6)],
    &[Piece::new(2, 10, 6)],
    &[Piece::new(2, 4, 6)],
    &[Piece::new(2, 0, 4).at(2), Piece::new(3, 14, 2)],
    &[Piece::new(3, 8, 6)],
    &[Piece::new(3, 2, 6)],
    &[Piece::new(3, 0, 2).at(4), Piece::new(4, 12, 4)],
    &[Piece::new(4, 6, 6)],
    &[Piece::new(4, 0, 6)],
];

/// Decodes the header, the modal sections and the CTL identifiers.
pub fn decode<S: WordSource + ?Sized>(
    source: &mut S,
    version: FormatVersion,
    map: MapType,
) -> Result<EepromHeader, DecodeError<S::Error>> {
    let layout = Layout::for_version(version);
    let mut header = EepromHeader::new(version, map);
    let mut reader = WordReader::new(source, layout.mode);

    let word = reader.next_word()?;
    header.turbo5_disable = flag(word, 15);
    header.rf_kill = flag(word, 14);
    header.device_type = take(word, 11, 3) as u8;
    header.turbo2w_max_power5 = take(word, 4, 7) as u8;
    if version >= FormatVersion::V4_0 {
        header.turbo2_disable = flag(word, 3);
    }
    header.g_mode = flag(word, 2);
    header.b_mode = flag(word, 1);
    header.a_mode = flag(word, 0);

    reader.seek(layout.antenna_gain);
    let word = reader.next_word()?;
    header.antenna_gain_max_5 = signed_byte(hi8(word));
    header.antenna_gain_max_2 = signed_byte(word);
    if version >= FormatVersion::V4_0 {
        let word = reader.next_word()?;
        header.disable_xr5 = flag(word, 13);
        header.disable_xr2 = flag(word, 12);
        header.ear_start = take(word, 0, 12);

        let word = reader.next_word()?;
        header.target_powers_start = take(word, 0, 12);
        header.exist_32khz_crystal = flag(word, 14);

        if version >= FormatVersion::V5_0 {
            reader.skip(2);
            header.map2_power_cal_start = take(reader.next_word()?, 4, 12);
        }
    }

    for band in Band::ALL {
        reader.seek(layout.modal[band.index()]);
        decode_modal(&mut reader, band, &mut header)?;
    }

    if version < FormatVersion::V3_3 {
        for (slot, offset) in [OB_DB_11B_OFFSET_PRE_3_3, OB_DB_11G_OFFSET_PRE_3_3]
            .into_iter()
            .enumerate()
        {
            let word = reader.read_at(offset)?;
            header.ob_2ghz[slot] = take(word, 0, 3) as u8;
            header.db_2ghz[slot] = take(word, 3, 3) as u8;
        }
    }

    reader.seek(layout.ctl);
    let num_ctls = if version >= FormatVersion::V3_3 {
        NUM_CTLS_3_3
    } else {
        NUM_CTLS
    };
    for _ in 0..num_ctls / 2 {
        let word = reader.next_word()?;
        let _ = header.ctl_ids.push(hi8(word) as u8);
        let _ = header.ctl_ids.push(lo8(word) as u8);
    }

    if version >= FormatVersion::V5_3 {
        let spurs = AR_EEPROM_MODAL_SPURS as u32;
        for pair in header.spur_chans.iter_mut() {
            let offset = reader.offset();
            *pair = [reader.read_at(offset)?, reader.read_at(offset + spurs)?];
            reader.skip(1);
        }
    }

    if version <= FormatVersion::V3_2 {
        for (band, (noise_floor, thresh62)) in
            Band::ALL.into_iter().zip([(-54, 15), (-1, 28), (-1, 28)])
        {
            let modal = &mut header.modal[band.index()];
            modal.noise_floor_thresh = noise_floor;
            modal.thresh62 = thresh62;
        }
    }

    let (reg_cap_offset, new_11a) = if version >= FormatVersion::V4_0 {
        (REG_CAP_OFFSET, REG_CAP_EN_KK_NEW_11A)
    } else {
        (REG_CAP_OFFSET_PRE_4_0, REG_CAP_EN_KK_NEW_11A_PRE_4_0)
    };
    header.reg_cap = reader.read_at(reg_cap_offset)?;
    if !header.a_mode && header.reg_cap & new_11a != 0 {
        debug!("11a enabled by regulatory capability {:#x}", header.reg_cap);
        header.a_mode = true;
    }

    debug!(
        "header: a={} b={} g={} ctls={}",
        header.a_mode,
        header.b_mode,
        header.g_mode,
        header.ctl_ids.len()
    );
    Ok(header)
}

fn decode_modal<S: WordSource + ?Sized>(
    reader: &mut WordReader<'_, S>,
    band: Band,
    header: &mut EepromHeader,
) -> Result<(), DecodeError<S::Error>> {
    let version = header.version;
    let mut modal = ModalHeader::default();

    let words = reader.read_group::<5>()?;
    modal.switch_settling = unpack(&words, SWITCH_SETTLING) as u8;
    modal.txrx_atten = unpack(&words, TXRX_ATTEN) as u8;
    for (control, field) in modal.antenna_control.iter_mut().zip(ANTENNA_CONTROL) {
        *control = unpack(&words, field) as u8;
    }

    let word = reader.next_word()?;
    modal.adc_desired_size = signed_byte(hi8(word));
    match band {
        Band::A => {
            header.ob_5[3] = take(word, 5, 3) as u8;
            header.db_5[3] = take(word, 2, 3) as u8;
            header.ob_5[2] = (take(word, 0, 2) << 1) as u8;

            let word = reader.next_word()?;
            header.ob_5[2] |= take(word, 15, 1) as u8;
            header.db_5[2] = take(word, 12, 3) as u8;
            header.ob_5[1] = take(word, 9, 3) as u8;
            header.db_5[1] = take(word, 6, 3) as u8;
            header.ob_5[0] = take(word, 3, 3) as u8;
            header.db_5[0] = take(word, 0, 3) as u8;
        }
        Band::B | Band::G => {
            modal.ob = take(word, 4, 3) as u8;
            modal.db = take(word, 0, 3) as u8;
        }
    }

    let word = reader.next_word()?;
    modal.tx_end_to_xlna_on = hi8(word) as u8;
    modal.thresh62 = lo8(word) as u8;

    let word = reader.next_word()?;
    modal.tx_end_to_xpa_off = hi8(word) as u8;
    modal.tx_frame_to_xpa_on = lo8(word) as u8;

    let word = reader.next_word()?;
    modal.pga_desired_size = signed_byte(hi8(word));
    modal.noise_floor_thresh = i16::from(signed_byte(word));

    let word = reader.next_word()?;
    modal.xlna_gain = take(word, 5, 8) as u8;
    modal.xgain = take(word, 1, 4) as u8;
    modal.xpd = flag(word, 0);
    if version >= FormatVersion::V4_0 {
        match band {
            Band::A => header.fixed_bias5 = flag(word, 13),
            Band::G => header.fixed_bias2 = flag(word, 13),
            Band::B => {}
        }
    }

    let mut word = 0;
    if version >= FormatVersion::V3_3 {
        word = reader.next_word()?;
        modal.false_detect_backoff = take(word, 6, 7) as u8;
        match band {
            Band::A => header.xr_target_power5 = take(word, 0, 6) as u8,
            Band::B | Band::G => {
                let slot = band.index() - 1;
                header.ob_2ghz[slot] = take(word, 0, 3) as u8;
                header.db_2ghz[slot] = take(word, 3, 3) as u8;
            }
        }
    }

    if version >= FormatVersion::V3_4 {
        let low = take(word, 13, 3);
        let word = reader.next_word()?;
        modal.gain_i = (low | take(word, 0, 3) << 3) as u8;
        match band {
            Band::G => {
                header.cck_ofdm_pwr_delta = take(word, 3, 8) as u8;
                if version >= FormatVersion::V4_6 {
                    header.scaled_ch14_filter_cck_delta = take(word, 11, 5) as u8;
                }
            }
            Band::A if version >= FormatVersion::V4_0 => {
                header.iq_cal[0] = IqCal {
                    i: take(word, 8, 6) as u8,
                    q: take(word, 3, 5) as u8,
                };
            }
            _ => {}
        }
    } else {
        modal.gain_i = GAIN_I_DEFAULT;
        header.cck_ofdm_pwr_delta = TENX_OFDM_CCK_DELTA_INIT;
    }

    if version >= FormatVersion::V4_0 {
        match band {
            Band::A => decode_modal_a_tail(reader, version, &mut modal)?,
            Band::B => {
                let word = reader.next_word()?;
                header.cal_pier_11b[0] = pier_2ghz(version, lo8(word));
                header.cal_pier_11b[1] = pier_2ghz(version, hi8(word));
                let word = reader.next_word()?;
                header.cal_pier_11b[2] = pier_2ghz(version, lo8(word));
                if version >= FormatVersion::V4_1 {
                    modal.rxtx_margin = take(word, 8, 6) as u8;
                }
            }
            Band::G => decode_modal_g_tail(reader, header, &mut modal)?,
        }
    }

    trace!(
        "modal {}: settling={} atten={} gain_i={}",
        band.index(),
        modal.switch_settling,
        modal.txrx_atten,
        modal.gain_i
    );
    header.modal[band.index()] = modal;
    Ok(())
}

fn decode_modal_a_tail<S: WordSource + ?Sized>(
    reader: &mut WordReader<'_, S>,
    version: FormatVersion,
    modal: &mut ModalHeader,
) -> Result<(), DecodeError<S::Error>> {
    if version < FormatVersion::V4_1 {
        return Ok(());
    }
    let word = reader.next_word()?;
    modal.rxtx_margin = take(word, 0, 6) as u8;
    if version >= FormatVersion::V5_0 {
        let [second, third] = reader.read_group::<2>()?;
        modal.turbo = Some(TurboModal {
            switch_settling: take(word, 6, 7) as u8,
            txrx_atten: (take(word, 13, 3) | take(second, 0, 3) << 3) as u8,
            rxtx_margin: take(second, 3, 6) as u8,
            adc_desired_size: signed_byte(take(second, 9, 7) | take(third, 0, 1) << 7),
            pga_desired_size: signed_byte(take(third, 1, 8)),
        });
    }
    Ok(())
}

fn decode_modal_g_tail<S: WordSource + ?Sized>(
    reader: &mut WordReader<'_, S>,
    header: &mut EepromHeader,
    modal: &mut ModalHeader,
) -> Result<(), DecodeError<S::Error>> {
    let version = header.version;
    let word = reader.next_word()?;
    header.cal_pier_11g[0] = pier_2ghz(version, lo8(word));
    header.cal_pier_11g[1] = pier_2ghz(version, hi8(word));

    let word = reader.next_word()?;
    header.turbo2w_max_power2 = take(word, 0, 7) as u8;
    header.xr_target_power2 = take(word, 7, 6) as u8;

    let word = reader.next_word()?;
    header.cal_pier_11g[2] = pier_2ghz(version, lo8(word));
    if version >= FormatVersion::V4_1 {
        modal.rxtx_margin = take(word, 8, 6) as u8;
    }

    let word = reader.next_word()?;
    header.iq_cal[1] = IqCal {
        i: take(word, 5, 6) as u8,
        q: take(word, 0, 5) as u8,
    };

    if version >= FormatVersion::V4_2 {
        let word = reader.next_word()?;
        header.cck_ofdm_gain_delta = lo8(word) as u8;
        if version >= FormatVersion::V5_0 {
            let [second, third] = reader.read_group::<2>()?;
            modal.turbo = Some(TurboModal {
                switch_settling: take(word, 8, 7) as u8,
                txrx_atten: (take(word, 15, 1) | take(second, 0, 5) << 1) as u8,
                rxtx_margin: take(second, 5, 6) as u8,
                adc_desired_size: signed_byte(take(second, 11, 5) | take(third, 0, 3) << 5),
                pga_desired_size: signed_byte(take(third, 3, 8)),
            });
        }
    }
    Ok(())
}

fn pier_2ghz(version: FormatVersion, bin: u16) -> u16 {
    bin_to_frequency(Spectrum::Ghz2, version, bin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::{assert_disjoint, width};
    use crate::testutil::Image;

    fn decode_image(image: &mut Image) -> EepromHeader {
        let version = FormatVersion::from_raw(image.words()[0xc1]).unwrap();
        decode(image.words_mut(), version, MapType::Pcdac).unwrap()
    }

    #[test]
    fn test_antenna_window_is_disjoint() {
        let mut fields = std::vec![SWITCH_SETTLING, TXRX_ATTEN];
        fields.extend_from_slice(&ANTENNA_CONTROL);
        assert_disjoint(5, &fields);
        // Every bit of the five words is assigned except bit 15 of word 0.
        let total: u32 = fields.iter().map(|field| width(field)).sum();
        assert_eq!(total, 5 * 16 - 1);
    }

    #[test]
    fn test_mode_and_antenna_gain_words() {
        let mut image = Image::with_version(0x3003);
        image.set(0xc2, 0xc85f);
        image.set(0xc3, 0xfe05);
        let header = decode_image(&mut image);
        assert!(header.turbo5_disable);
        assert!(header.rf_kill);
        assert_eq!(header.device_type, 1);
        assert_eq!(header.turbo2w_max_power5, 5);
        assert!(header.turbo2_disable);
        assert!(header.band_enabled(Band::A));
        assert!(header.band_enabled(Band::B));
        assert!(header.band_enabled(Band::G));
        assert_eq!(header.antenna_gain_max_5, -2);
        assert_eq!(header.antenna_gain_max_2, 5);
        assert_eq!(header.ctl_ids.len(), 32);
    }

    #[test]
    fn test_section_offsets_from_4_0() {
        let mut image = Image::with_version(0x5000);
        image.set(0xc2, 0x0000);
        image.set(0xc4, 0x3123);
        image.set(0xc5, 0x4456);
        image.set(0xc8, 0x1230);
        let header = decode_image(&mut image);
        assert!(!header.turbo2_disable);
        assert!(header.disable_xr5);
        assert!(header.disable_xr2);
        assert_eq!(header.ear_start, 0x123);
        assert_eq!(header.target_powers_start, 0x456);
        assert!(header.exist_32khz_crystal);
        assert_eq!(header.map2_power_cal_start, 0x123);
    }

    #[test]
    fn test_antenna_controls() {
        let mut image = Image::with_version(0x3003);
        let base = Layout::FROM_3_3.modal[Band::B.index()];
        for (index, field) in ANTENNA_CONTROL.iter().enumerate() {
            image.pack(base, field, 0x20 | index as u16);
        }
        image.pack(base, SWITCH_SETTLING, 0x2d);
        image.pack(base, TXRX_ATTEN, 0x17);
        let modal = *decode_image(&mut image).modal(Band::B);
        assert_eq!(modal.switch_settling, 0x2d);
        assert_eq!(modal.txrx_atten, 0x17);
        for (index, control) in modal.antenna_control.iter().enumerate() {
            assert_eq!(*control, 0x20 | index as u8);
        }
    }

    #[test]
    fn test_modal_a_with_turbo() {
        let mut image = Image::with_version(0x5000);
        let base = Layout::FROM_3_3.modal[Band::A.index()];
        image.set(base + 5, 0xf000 | 5 << 5 | 3 << 2 | 0b01);
        image.set(base + 6, 1 << 15 | 2 << 12 | 4 << 9 | 1 << 6 | 6 << 3 | 7);
        image.set(base + 7, 0x1122);
        image.set(base + 8, 0x3344);
        image.set(base + 9, 0xf6c4);
        image.set(base + 10, 1 << 13 | 0x9a << 5 | 0xb << 1 | 1);
        image.set(base + 11, 0b101 << 13 | 0x33 << 6 | 0x2e);
        image.set(base + 12, 0x2a << 8 | 0x11 << 3 | 0b110);
        image.set(base + 13, 0xb555);
        image.set(base + 14, 0x804a);
        image.set(base + 15, 0x01fb);
        let header = decode_image(&mut image);
        let modal = header.modal(Band::A);

        assert_eq!(modal.adc_desired_size, -16);
        assert_eq!(header.ob_5, [6, 4, 3, 5]);
        assert_eq!(header.db_5, [7, 1, 2, 3]);
        assert_eq!(modal.tx_end_to_xlna_on, 0x11);
        assert_eq!(modal.thresh62, 0x22);
        assert_eq!(modal.tx_end_to_xpa_off, 0x33);
        assert_eq!(modal.tx_frame_to_xpa_on, 0x44);
        assert_eq!(modal.pga_desired_size, -10);
        assert_eq!(modal.noise_floor_thresh, -60);
        assert_eq!(modal.xlna_gain, 0x9a);
        assert_eq!(modal.xgain, 0xb);
        assert!(modal.xpd);
        assert!(header.fixed_bias5);
        assert_eq!(modal.false_detect_backoff, 0x33);
        assert_eq!(header.xr_target_power5, 0x2e);
        assert_eq!(modal.gain_i, 0b110_101);
        assert_eq!(header.iq_cal[0], IqCal { i: 0x2a, q: 0x11 });
        assert_eq!(modal.rxtx_margin, 0x15);
        assert_eq!(
            modal.turbo,
            Some(TurboModal {
                switch_settling: 0x55,
                txrx_atten: 21,
                rxtx_margin: 9,
                adc_desired_size: -64,
                pga_desired_size: -3,
            })
        );
    }

    #[test]
    fn test_modal_b_and_g_piers() {
        let mut image = Image::with_version(0x4002);
        let b = Layout::FROM_3_3.modal[Band::B.index()];
        image.set(b + 5, 0x0035);
        image.set(b + 10, 2 << 3 | 6);
        image.set(b + 12, 0x9370);
        image.set(b + 13, 0x2ab8);

        let g = Layout::FROM_3_3.modal[Band::G.index()];
        image.set(g + 5, 0x0042);
        image.set(g + 10, 1 << 3 | 4);
        image.set(g + 11, 0x1f << 11 | 0x81 << 3);
        image.set(g + 12, 0x9370);
        image.set(g + 13, 0x1f << 7 | 0x3c);
        image.set(g + 14, 0x15b8);
        image.set(g + 15, 0x21 << 5 | 0x0c);
        image.set(g + 16, 0xaa0e);
        let header = decode_image(&mut image);

        assert_eq!(header.modal(Band::B).ob, 3);
        assert_eq!(header.modal(Band::B).db, 5);
        assert_eq!(header.modal(Band::G).ob, 4);
        assert_eq!(header.modal(Band::G).db, 2);
        assert_eq!(header.ob_2ghz, [6, 4]);
        assert_eq!(header.db_2ghz, [2, 1]);
        assert_eq!(header.cal_pier_11b, [2412, 2447, 2484]);
        assert_eq!(header.modal(Band::B).rxtx_margin, 0x2a);
        assert_eq!(header.cal_pier_11g, [2412, 2447, 2484]);
        assert_eq!(header.modal(Band::G).rxtx_margin, 0x15);
        assert_eq!(header.cck_ofdm_pwr_delta, 0x81);
        // Only stored from 4.6.
        assert_eq!(header.scaled_ch14_filter_cck_delta, TENX_CH14_FILTER_CCK_DELTA_INIT);
        assert_eq!(header.turbo2w_max_power2, 0x3c);
        assert_eq!(header.xr_target_power2, 0x1f);
        assert_eq!(header.iq_cal[1], IqCal { i: 0x21, q: 0x0c });
        assert_eq!(header.cck_ofdm_gain_delta, 0x0e);
        assert_eq!(header.modal(Band::G).turbo, None);
    }

    #[test]
    fn test_pre_3_3_defaults_and_overrides() {
        let mut image = Image::with_version(0x3002);
        image.set(0xc2, 0x0003);
        image.set(Layout::PRE_3_3.modal[0] + 9, 0x0007);
        image.set(0xec, 3 << 3 | 5);
        image.set(0xed, 1 << 3 | 2);
        image.set(0xe4, 0x1011);
        image.set(0xe5, 0x2000);
        let header = decode_image(&mut image);

        assert_eq!(header.modal(Band::A).noise_floor_thresh, -54);
        assert_eq!(header.modal(Band::B).noise_floor_thresh, -1);
        assert_eq!(header.modal(Band::G).noise_floor_thresh, -1);
        assert_eq!(header.modal(Band::A).thresh62, 15);
        assert_eq!(header.modal(Band::G).thresh62, 28);
        assert_eq!(header.modal(Band::A).gain_i, GAIN_I_DEFAULT);
        assert_eq!(header.cck_ofdm_pwr_delta, TENX_OFDM_CCK_DELTA_INIT);
        assert_eq!(header.ob_2ghz, [5, 2]);
        assert_eq!(header.db_2ghz, [3, 1]);
        assert_eq!(header.ctl_ids.len(), 16);
        assert_eq!(&header.ctl_ids[..4], &[0x10, 0x11, 0x20, 0x00]);
        assert_eq!(header.corner_cal, CornerCal::default());
    }

    #[test]
    fn test_reg_cap_enables_11a() {
        let mut image = Image::with_version(0x4000);
        image.set(0xc2, 0x0006);
        image.set(0xca, REG_CAP_EN_KK_NEW_11A);
        let header = decode_image(&mut image);
        assert!(header.a_mode);
        assert_eq!(header.reg_cap, REG_CAP_EN_KK_NEW_11A);

        let mut image = Image::with_version(0x3003);
        image.set(0xcf, REG_CAP_EN_KK_NEW_11A_PRE_4_0);
        assert!(decode_image(&mut image).a_mode);

        // The post-4.0 bit means nothing before 4.0.
        let mut image = Image::with_version(0x3003);
        image.set(0xcf, REG_CAP_EN_KK_NEW_11A);
        assert!(!decode_image(&mut image).a_mode);
    }

    #[test]
    fn test_spur_channels_from_5_3() {
        let mut image = Image::with_version(0x5003);
        let spurs = Layout::FROM_3_3.ctl + 16;
        for i in 0..10 {
            image.set(spurs + i, 0x100 + i as u16);
        }
        let header = decode_image(&mut image);
        assert_eq!(header.spur_chans[0], [0x100, 0x105]);
        assert_eq!(header.spur_chans[4], [0x104, 0x109]);

        let mut image = Image::with_version(0x5000);
        image.set(spurs, 0x100);
        assert_eq!(decode_image(&mut image).spur_chans, [[0; 2]; 5]);
    }
}
