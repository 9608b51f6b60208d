//! Software reference model of the CIC decimator DUT.
//!
//! [`CicModel`] implements the [`Dut`] pin contract with a bit-exact
//! integrator/comb decimator so the verification suite can run without an
//! HDL simulator. Inputs are latched on the rising edge; outputs change only
//! on the rising edge and are therefore stable at every falling edge.
//!
//! Output framing: after each decimation period the new 15-bit sample is
//! placed on the output bytes and the handshake flag is raised for half a
//! decimation period. A reader that level-samples the flag would see the
//! same sample many times; only its rising transition marks a new sample.

use cicbench_common::{ControlWord, FilterOrder, OutputSample};
use log::trace;

use crate::clock::Clock;
use crate::dut::Dut;
use crate::error::SimError;
use crate::time::SimTime;

/// Width of a reconstructed output sample in bits.
const SAMPLE_BITS: u32 = 15;

/// Decimation ratios of the two filter configurations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelConfig {
    /// Decimation ratio with one integrator/comb stage.
    pub decimation_first: u32,
    /// Decimation ratio with two integrator/comb stages.
    pub decimation_second: u32,
}

impl ModelConfig {
    /// Returns the decimation ratio in effect for `order`.
    pub fn decimation(&self, order: FilterOrder) -> u32 {
        match order {
            FilterOrder::First => self.decimation_first,
            FilterOrder::Second => self.decimation_second,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            decimation_first: 32,
            decimation_second: 16,
        }
    }
}

/// What the model places on its outputs, selected by bits 4–7 of the control word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebugMode {
    /// Filtered, scaled samples (selector 0 and the reserved selectors 6–15).
    Normal,
    /// Low 15 bits of the first integrator.
    Integrator,
    /// Unscaled comb output.
    RawComb,
    /// Primary byte mirrors the stimulus bit (0x00 / 0xFF).
    InputEcho,
    /// Primary byte mirrors the secondary input bus.
    Loopback,
    /// Primary byte shows the decimation phase counter.
    Phase,
}

impl DebugMode {
    /// Decodes a 4-bit debug-mode selector.
    pub fn from_selector(selector: u8) -> Self {
        match selector {
            1 => DebugMode::Integrator,
            2 => DebugMode::RawComb,
            3 => DebugMode::InputEcho,
            4 => DebugMode::Loopback,
            5 => DebugMode::Phase,
            _ => DebugMode::Normal,
        }
    }
}

#[derive(Clone, Debug, Default)]
struct FilterState {
    integrators: [u32; 2],
    comb_delays: [u32; 2],
    phase: u32,
    raw_comb: u32,
    output: OutputSample,
    strobe_hold: u32,
    strobe: bool,
}

impl FilterState {
    fn integrate(&mut self, input: u32) {
        self.integrators[0] = self.integrators[0].wrapping_add(input);
        self.integrators[1] = self.integrators[1].wrapping_add(self.integrators[0]);
    }

    fn comb(&mut self, order: FilterOrder) -> u32 {
        match order {
            FilterOrder::First => {
                let y = self.integrators[0].wrapping_sub(self.comb_delays[0]);
                self.comb_delays[0] = self.integrators[0];
                y
            }
            FilterOrder::Second => {
                let c1 = self.integrators[1].wrapping_sub(self.comb_delays[0]);
                self.comb_delays[0] = self.integrators[1];
                let y = c1.wrapping_sub(self.comb_delays[1]);
                self.comb_delays[1] = c1;
                y
            }
        }
    }
}

/// Left shift that maps a full-scale comb output (`decimation^stages`) onto 15 bits.
fn output_shift(decimation: u32, order: FilterOrder) -> u32 {
    let gain = u64::from(decimation).saturating_pow(order.stages());
    let bits = gain.next_power_of_two().trailing_zeros();
    SAMPLE_BITS.saturating_sub(bits)
}

/// Bit-exact software model of the CIC decimator.
pub struct CicModel {
    config: ModelConfig,
    clock: Clock,
    control: ControlWord,
    secondary_in: u8,
    enabled: bool,
    in_reset: bool,
    state: FilterState,
    primary_out: u8,
    secondary_out: u8,
}

impl CicModel {
    /// Creates a model driven by `clock`. The model starts disabled and out of reset.
    pub fn new(config: ModelConfig, clock: Clock) -> Self {
        Self {
            config,
            clock,
            control: ControlWord::default(),
            secondary_in: 0,
            enabled: false,
            in_reset: false,
            state: FilterState::default(),
            primary_out: 0,
            secondary_out: 0,
        }
    }

    fn rising_edge(&mut self) {
        if self.in_reset {
            self.state = FilterState::default();
            self.primary_out = 0;
            self.secondary_out = 0;
            return;
        }
        if !self.enabled {
            return;
        }

        let order = self.control.order();
        let input = u32::from(self.control.data_bit());
        let decimation = self.config.decimation(order);

        let state = &mut self.state;
        state.integrate(input);
        if state.phase + 1 >= decimation {
            state.phase = 0;
            state.raw_comb = state.comb(order);
            let scaled = u64::from(state.raw_comb) << output_shift(decimation, order);
            state.output = OutputSample::saturating(scaled);
            state.strobe_hold = decimation / 2;
            trace!(
                "{order} sample {} (raw {}) at cycle {}",
                state.output,
                state.raw_comb,
                self.clock.cycles() + 1
            );
        } else {
            state.phase += 1;
        }
        state.strobe = state.strobe_hold > 0;
        if state.strobe {
            state.strobe_hold -= 1;
        }

        self.drive_outputs(input != 0);
    }

    fn drive_outputs(&mut self, input: bool) {
        let state = &self.state;
        let strobe = state.strobe;
        let (_, framed_secondary) = state.output.to_bus(strobe);
        let (primary, secondary) = match DebugMode::from_selector(self.control.debug_mode()) {
            DebugMode::Normal => state.output.to_bus(strobe),
            DebugMode::Integrator => {
                OutputSample::saturating(u64::from(state.integrators[0] & 0x7FFF)).to_bus(strobe)
            }
            DebugMode::RawComb => OutputSample::saturating(u64::from(state.raw_comb)).to_bus(strobe),
            DebugMode::InputEcho => (if input { 0xFF } else { 0x00 }, framed_secondary),
            DebugMode::Loopback => (self.secondary_in, framed_secondary),
            DebugMode::Phase => ((state.phase & 0xFF) as u8, framed_secondary),
        };
        self.primary_out = primary;
        self.secondary_out = secondary;
    }
}

impl Dut for CicModel {
    fn read_control_word(&self) -> ControlWord {
        self.control
    }

    fn write_control_word(&mut self, word: ControlWord) {
        self.control = word;
    }

    fn write_secondary_input(&mut self, value: u8) {
        self.secondary_in = value;
    }

    fn read_primary_output(&self) -> u8 {
        self.primary_out
    }

    fn read_secondary_output(&self) -> u8 {
        self.secondary_out
    }

    fn set_enable(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn assert_reset(&mut self) {
        self.in_reset = true;
    }

    fn release_reset(&mut self) {
        self.in_reset = false;
    }

    fn advance_one_cycle(&mut self) -> Result<(), SimError> {
        self.rising_edge();
        self.clock.tick();
        Ok(())
    }

    fn now(&self) -> SimTime {
        self.clock.now()
    }
}
