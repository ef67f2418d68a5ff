use crate::*;

/// Параметры сети. Создаются один раз до сборки сети и далее только читаются.
///
/// Производные (`derivative`, `output_derivative`) вызываются от выхода нейрона,
/// см. [`Derivative`].
#[derive(Clone, Debug)]
pub struct Parameters {
    /// Количество нейронов входного слоя
    pub input_layer_size: usize,
    /// Количество скрытых слоев
    pub hidden_layers: usize,
    /// Количество нейронов в каждом скрытом слое
    pub hidden_layers_size: usize,
    /// Количество нейронов выходного слоя (= количество классов)
    pub output_layer_size: usize,
    pub momentum: f64,
    pub learning_rate: f64,
    /// Количество эпох обучения
    pub epochs: usize,
    /// Зерно генератора случайных чисел для начальных весов
    pub seed: u64,
    pub initialization: Initializer,
    /// Активация входного и скрытых слоев
    pub activation: Activation,
    pub derivative: Derivative,
    pub output_activation: Activation,
    pub output_derivative: Derivative,
    pub error: ErrorFunction,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            input_layer_size: 2,
            hidden_layers: 2,
            hidden_layers_size: 2,
            output_layer_size: 2,
            momentum: 0.0,
            learning_rate: 1.0,
            epochs: 5_000,
            seed: 1,
            initialization: Initializer::XavierNormal,
            activation: Activation::Sigmoid,
            derivative: Activation::Sigmoid.derivative(),
            output_activation: Activation::Sigmoid,
            output_derivative: Activation::Sigmoid.derivative(),
            error: ErrorFunction::HalfSquared,
        }
    }
}

impl Parameters {
    /// Размеры слоев, остальное по умолчанию
    pub fn new(
        input_layer_size: usize,
        hidden_layers: usize,
        hidden_layers_size: usize,
        output_layer_size: usize,
    ) -> Self {
        Self {
            input_layer_size,
            hidden_layers,
            hidden_layers_size,
            output_layer_size,
            ..Self::default()
        }
    }

    /// Функции активации скрытых и выходного слоя вместе с согласованными производными
    pub fn with_activations(self, activation: Activation, output_activation: Activation) -> Self {
        Self {
            activation,
            derivative: activation.derivative(),
            output_activation,
            output_derivative: output_activation.derivative(),
            ..self
        }
    }

    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("input_layer_size", self.input_layer_size),
            ("hidden_layers", self.hidden_layers),
            ("hidden_layers_size", self.hidden_layers_size),
            ("output_layer_size", self.output_layer_size),
            ("epochs", self.epochs),
        ];
        if let Some((name, _)) = sizes.iter().find(|(_, v)| *v == 0) {
            return Err(NetworkError::InvalidConfig(format!("{name} must be positive")));
        }
        if !self.learning_rate.is_finite() {
            return Err(NetworkError::InvalidConfig(format!(
                "learning_rate must be finite, got {}", self.learning_rate
            )));
        }
        if !self.momentum.is_finite() {
            return Err(NetworkError::InvalidConfig(format!(
                "momentum must be finite, got {}", self.momentum
            )));
        }
        Ok(())
    }

    /// Топология сети послойно: входной, скрытые, выходной
    pub fn topology(&self) -> Vec<LayerTopology> {
        let mut layers = Vec::with_capacity(self.hidden_layers + 2);
        layers.push(LayerTopology::new(self.input_layer_size, self.activation));
        for _ in 0..self.hidden_layers {
            layers.push(LayerTopology::new(self.hidden_layers_size, self.activation));
        }
        layers.push(LayerTopology::new(self.output_layer_size, self.output_activation));
        layers
    }
}
