use crate::*;

/// Адрес нейрона в сети: (№слоя, №нейрона в слое).
/// Слой 0 - входной, далее скрытые, последний - выходной.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NeuronId {
    pub layer: usize,
    pub position: usize,
}

impl NeuronId {
    pub fn new(layer: usize, position: usize) -> Self {
        Self { layer, position }
    }
}

/// Откуда синапс берет значение
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    /// Связь входного слоя: вес синапса и есть входное значение
    Input,
    /// Смещение: постоянный вход 1
    Bias,
    /// Выход нейрона предыдущего слоя
    Neuron(NeuronId),
}

/// Синапс - взвешенная входная связь нейрона.
///
/// `delta` и `delta_weight` - рабочие значения одного прохода обратного
/// распространения, между шагами обучения сохраняется только `weight`
/// (и `delta_weight` как слагаемое момента).
#[derive(Clone, Debug)]
pub struct Synapse {
    weight: f64,
    /// Последнее (или подготовленное) изменение веса
    delta_weight: f64,
    /// Сигнал ошибки текущего прохода
    delta: f64,
    source: Source,
}

impl Synapse {
    /// Связь с нейроном предыдущего слоя
    pub fn new(weight: f64, source: NeuronId) -> Self {
        Self::with_source(weight, Source::Neuron(source))
    }
    /// Смещение (bias)
    pub fn bias(weight: f64) -> Self {
        Self::with_source(weight, Source::Bias)
    }
    /// Связь входного слоя, вес 1 до первой подачи входа
    pub fn input() -> Self {
        Self::with_source(1.0, Source::Input)
    }

    fn with_source(weight: f64, source: Source) -> Self {
        Self { weight, delta_weight: 0.0, delta: 0.0, source }
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
    pub fn delta(&self) -> f64 {
        self.delta
    }
    pub fn delta_weight(&self) -> f64 {
        self.delta_weight
    }
    pub fn source(&self) -> Source {
        self.source
    }
    pub fn is_bias(&self) -> bool {
        self.source == Source::Bias
    }

    /// Вклад синапса во взвешенную сумму нейрона.
    /// `upstream` - слои, предшествующие слою нейрона-владельца.
    /// Смещение и входная связь upstream не читают.
    pub fn product(&self, upstream: &[Vec<Neuron>]) -> Result<f64> {
        match self.source {
            Source::Input | Source::Bias => Ok(self.weight * 1.0),
            Source::Neuron(id) => {
                let neuron = upstream
                    .get(id.layer)
                    .and_then(|layer| layer.get(id.position))
                    .ok_or_else(|| NetworkError::InvalidState(format!(
                        "synapse source {id:?} is not in a preceding layer"
                    )))?;
                Ok(self.weight * neuron.computed_output()?)
            }
        }
    }

    pub(crate) fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }
    /// Запоминает сигнал ошибки и готовит изменение веса с учетом момента:
    /// delta_weight = delta + momentum * предыдущий delta_weight
    pub(crate) fn record_delta(&mut self, delta: f64, momentum: f64) {
        self.delta = delta;
        self.delta_weight = delta + momentum * self.delta_weight;
    }
    pub(crate) fn update_weight(&mut self) {
        self.weight -= self.delta_weight;
    }
}
