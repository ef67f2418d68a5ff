use crate::*;

/// Прямое распространение: пересчет выходов всех нейронов послойно
#[derive(Clone, Copy, Debug, Default)]
pub struct FeedForward;

impl FeedForward {
    pub fn new() -> Self {
        Self
    }

    /// Подает вход на сеть и пересчитывает выходы всех слоев по порядку.
    /// Результат читается из выходного слоя.
    ///
    /// Входной слой не прозрачный: его выход - функция активации от входного значения.
    pub fn apply(&self, layers: &mut NetworkLayers, input: &[f64]) -> Result<()> {
        layers.ensure_connected()?;
        let expected = layers.input_layer().len();
        if input.len() != expected {
            return Err(NetworkError::ShapeMismatch { what: "input", expected, actual: input.len() });
        }
        let layers = layers.layers_mut();
        //входной слой: вход записывается в вес единственной связи
        for (neuron, x) in layers[0].iter_mut().zip(input) {
            let synapse = neuron.inputs_mut().first_mut().ok_or_else(|| {
                NetworkError::InvalidState("input neuron has no carrier synapse".into())
            })?;
            synapse.set_weight(*x);
            neuron.calculate_output(&[])?;
        }
        //скрытые слои, затем выходной
        for layer_num in 1..layers.len() {
            let (upstream, rest) = layers.split_at_mut(layer_num);
            for neuron in rest[0].iter_mut() {
                neuron.calculate_output(upstream)?;
            }
        }
        Ok(())
    }
}
