use crate::*;
use tracing::{debug, trace};

/// Итоги одной эпохи обучения
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpochReport {
    /// Номер эпохи, начиная с 1
    pub epoch: usize,
    /// Средняя по примерам ошибка (ошибка примера - среднее по выходам)
    pub mean_error: f64,
}

/// Полносвязная сеть прямого распространения для классификации,
/// обучаемая обратным распространением ошибки.
///
/// Создается только через [`NeuralNetworkFactory`]. Любой вызов пересчитывает
/// выходы нейронов, поэтому методы расчета требуют `&mut self`.
#[derive(Clone, Debug)]
pub struct NeuralNetwork {
    layers: NetworkLayers,
    epochs: usize,
    error: ErrorFunction,
    feed_forward: FeedForward,
    backpropagation: Backpropagation,
}

impl NeuralNetwork {
    pub(crate) fn new(parameters: &Parameters, layers: NetworkLayers) -> Result<Self> {
        layers.ensure_connected()?;
        Ok(Self {
            layers,
            epochs: parameters.epochs,
            error: parameters.error,
            feed_forward: FeedForward::new(),
            backpropagation: Backpropagation::new(parameters),
        })
    }

    /// Обучение: `epochs` проходов по всем примерам в заданном порядке,
    /// веса обновляются после каждого примера.
    pub fn learn(&mut self, training_data: &[Vec<f64>], labels: &[usize]) -> Result<()> {
        self.learn_with(training_data, labels, |_| {})
    }

    /// То же, что [`learn`](Self::learn), но после каждой эпохи вызывает `observer`
    pub fn learn_with<F>(&mut self, training_data: &[Vec<f64>], labels: &[usize], mut observer: F) -> Result<()>
    where
        F: FnMut(&EpochReport),
    {
        self.validate_training_set(training_data, labels)?;
        let targets: Vec<Vec<f64>> = labels.iter().map(|label| self.target(*label)).collect();
        debug!(examples = training_data.len(), epochs = self.epochs, "training started");

        let mut last = None;
        for epoch in 1..=self.epochs {
            let mut errors = Vec::with_capacity(training_data.len());
            for (input, target) in training_data.iter().zip(&targets) {
                self.feed_forward.apply(&mut self.layers, input)?;
                self.backpropagation.apply(&mut self.layers, target)?;
                errors.push(self.learning_error(input, target)?);
            }
            let report = EpochReport { epoch, mean_error: mean(&errors) };
            trace!(epoch, mean_error = report.mean_error, "epoch finished");
            observer(&report);
            last = Some(report);
        }

        if let Some(report) = last {
            debug!(epochs = report.epoch, mean_error = report.mean_error, "training finished");
        }
        Ok(())
    }

    /// Выход сети для одного входа (по порядку нейронов выходного слоя)
    pub fn get_output(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        self.feed_forward.apply(&mut self.layers, input)?;
        self.layers
            .output_layer()
            .iter()
            .map(|neuron| neuron.computed_output())
            .collect()
    }

    /// Номер класса с наибольшим выходом
    pub fn classify(&mut self, input: &[f64]) -> Result<usize> {
        self.get_output(input)?
            .iter()
            .position_max_by(|a, b| a.total_cmp(b))
            .ok_or_else(|| NetworkError::InvalidState("output layer is empty".into()))
    }

    /// Целевой вектор для метки: 1.0 на позиции метки, остальное 0.0
    pub fn target(&self, label: usize) -> Vec<f64> {
        (0..self.classes())
            .map(|i| if i == label { 1.0 } else { 0.0 })
            .collect()
    }

    /// Количество классов (размер выходного слоя)
    pub fn classes(&self) -> usize {
        self.layers.output_layer().len()
    }

    pub fn layers(&self) -> &NetworkLayers {
        &self.layers
    }

    /// Все проверки до начала обучения
    fn validate_training_set(&self, training_data: &[Vec<f64>], labels: &[usize]) -> Result<()> {
        if training_data.is_empty() {
            return Err(NetworkError::EmptyTrainingSet);
        }
        if labels.len() != training_data.len() {
            return Err(NetworkError::ShapeMismatch {
                what: "labels",
                expected: training_data.len(),
                actual: labels.len(),
            });
        }
        let inputs = self.layers.input_layer().len();
        if let Some(row) = training_data.iter().find(|row| row.len() != inputs) {
            return Err(NetworkError::ShapeMismatch { what: "input", expected: inputs, actual: row.len() });
        }
        let classes = self.classes();
        if let Some((index, label)) = labels.iter().enumerate().find(|(_, label)| **label >= classes) {
            return Err(NetworkError::LabelOutOfRange { index, label: *label, classes });
        }
        Ok(())
    }

    /// Ошибка на примере после шага обучения: среднее error(выход, цель) по выходам
    fn learning_error(&mut self, input: &[f64], target: &[f64]) -> Result<f64> {
        let error = self.error;
        let errors: Vec<f64> = self.get_output(input)?
            .iter()
            .zip(target)
            .map(|(output, target)| error.apply(*output, *target))
            .collect();
        Ok(mean(&errors))
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
