use crate::*;

/// Топология слоя
#[derive(Clone, Copy, Debug)]
pub struct LayerTopology {
    /// Количество нейронов в слое
    pub neurons: usize,
    /// Функция активации нейронов слоя
    pub activation: Activation,
}

impl LayerTopology {
    pub fn new(neurons: usize, activation: Activation) -> Self {
        Self { neurons, activation }
    }
}
