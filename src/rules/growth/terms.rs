// Universes are `[lo, hi, step]`, terms are `(name, [a, b, c])`.

pub(crate) const RAINFALL_UNIVERSE: [f64; 3] = [0.0, 50.0, 1.0];
pub(crate) const TEMPERATURE_UNIVERSE: [f64; 3] = [0.0, 50.0, 1.0];
pub(crate) const GROWTH_UNIVERSE: [f64; 3] = [0.0, 60.0, 1.0];

pub(crate) const RAINFALL: &[(&str, [f64; 3])] =
    &[("baixa", [0.0, 0.0, 25.0]), ("regular", [0.0, 25.0, 50.0]), ("chuvoso", [25.0, 50.0, 50.0])];

pub(crate) const TEMPERATURE: &[(&str, [f64; 3])] =
    &[("baixa", [0.0, 0.0, 25.0]), ("media", [0.0, 25.0, 50.0]), ("alta", [25.0, 50.0, 50.0])];

pub(crate) const GROWTH: &[(&str, [f64; 3])] =
    &[("baixo", [0.0, 0.0, 30.0]), ("medio", [0.0, 30.0, 60.0]), ("alto", [30.0, 60.0, 60.0])];
