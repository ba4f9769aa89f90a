use crate::constants::MINA_SCALE;
use rust_decimal::Decimal;
use std::time::Duration;

/// Converts Nanomina to Mina, strips any trailing zeros, and converts -0 to 0.
pub fn nanomina_to_mina(nanomina: u64) -> String {
    let mut dec = Decimal::from(nanomina);
    dec.set_scale(MINA_SCALE).ok();
    dec.normalize().to_string()
}

pub fn pretty_print_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1_000 {
        format!("{millis}ms")
    } else {
        format!("{:.3}s", duration.as_secs_f64())
    }
}
