use std::{
    io::{self, Write},
    iter::{once, repeat, repeat_n},
};

/// a horizontal bar showing a percentage.
pub struct Meter<'a> {
    pub name: &'a str,
    pub percentage: f64,
    pub width: usize,
}

/// === impl Meter ===

impl Meter<'_> {
    // XXX: a simple, hacky meter.
    pub fn draw(&self, writer: &mut impl Write) -> io::Result<()> {
        const ACTIVE: char = '█';
        const IDLE: char = ' ';
        const BORDER_L: char = '[';
        const BORDER_R: char = ']';

        let Self { name, width, .. } = *self;

        // print the label.
        write!(writer, "{name:<8}")?;

        // print the meter.
        let meter = {
            let active = repeat_n(ACTIVE, self.filled());
            let idle = repeat(IDLE);
            active.chain(idle).take(width)
        };
        let meter = once(BORDER_L).chain(meter).chain(once(BORDER_R));
        writer.write_all(meter.collect::<String>().as_bytes())?;

        Ok(())
    }

    /// the number of cells to fill, rounded to the nearest cell.
    fn filled(&self) -> usize {
        let Self {
            percentage, width, ..
        } = *self;

        let fraction = if percentage.is_finite() {
            percentage.clamp(0.0, 100.0) / 100.0
        } else {
            0.0
        };

        // this is bounded by `width`, so the cast cannot truncate.
        (fraction * width as f64).round() as usize
    }
}
