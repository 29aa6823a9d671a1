//! PIO-driven WS2812 pixel strip
//!
//! One PIO state machine shifts 24-bit GRB words out on a side-set pin
//! with the 800 kHz single-wire timing. Each bit takes ten PIO cycles: a
//! short high phase, a data phase that is high for ones, and a low tail.
//!
//! The TX FIFO is joined to eight words, so strips up to eight pixels are
//! queued without waiting. Longer strips wait for FIFO space, roughly
//! 30 µs per extra pixel.

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pio::{
    Common, Config, Direction as PioDirection, FifoJoin, Instance, PioPin, ShiftConfig,
    ShiftDirection, StateMachine,
};
use embassy_rp::Peri;
use fixed::types::U24F8;
use gripdrive_core::traits::{PixelSink, Rgb};

/// Line rate of the WS2812 protocol
pub const BIT_RATE_HZ: u32 = 800_000;

/// PIO cycles spent on each bit
const CYCLES_PER_BIT: u32 = 10;

/// PIO clock divider for `sys_hz`, as 16.8 fixed-point bits
pub fn clock_divider_bits(sys_hz: u32) -> u32 {
    let pio_hz = (BIT_RATE_HZ * CYCLES_PER_BIT) as u64;
    ((sys_hz as u64 * 256) / pio_hz) as u32
}

/// Pack a color into the FIFO word layout (GRB, MSB first)
pub const fn grb_word(color: Rgb) -> u32 {
    ((color.g as u32) << 24) | ((color.r as u32) << 16) | ((color.b as u32) << 8)
}

/// WS2812 strip on one PIO state machine
pub struct Ws2812<'d, PIO: Instance, const SM: usize> {
    sm: StateMachine<'d, PIO, SM>,
}

impl<'d, PIO: Instance, const SM: usize> Ws2812<'d, PIO, SM> {
    /// Load the bit program and start the state machine on `pin`
    pub fn new(
        common: &mut Common<'d, PIO>,
        mut sm: StateMachine<'d, PIO, SM>,
        pin: Peri<'d, impl PioPin>,
    ) -> Self {
        // T1 = 2, T2 = 5, T3 = 3 cycles
        let prg = pio::pio_asm!(
            ".side_set 1",
            ".wrap_target",
            "bitloop:",
            "    out x, 1       side 0 [2]",
            "    jmp !x do_zero side 1 [1]",
            "    jmp bitloop    side 1 [4]",
            "do_zero:",
            "    nop            side 0 [4]",
            ".wrap"
        );
        let installed = common.load_program(&prg.program);

        let out_pin = common.make_pio_pin(pin);

        let mut cfg = Config::default();
        cfg.use_program(&installed, &[&out_pin]);
        cfg.clock_divider = U24F8::from_bits(clock_divider_bits(clk_sys_freq()));
        cfg.fifo_join = FifoJoin::TxOnly;
        cfg.shift_out = ShiftConfig {
            auto_fill: true,
            threshold: 24,
            direction: ShiftDirection::Left,
        };

        sm.set_config(&cfg);
        sm.set_pin_dirs(PioDirection::Out, &[&out_pin]);
        sm.set_enable(true);

        Self { sm }
    }
}

impl<PIO: Instance, const SM: usize> PixelSink for Ws2812<'_, PIO, SM> {
    fn show(&mut self, frame: &[Rgb]) {
        let tx = self.sm.tx();
        for &color in frame {
            let word = grb_word(color);
            while !tx.try_push(word) {}
        }
    }
}
