use crate::*;
use tracing::debug;

/// Слои сети и связи между ними.
///
/// Все нейроны хранятся послойно в `layers`: 0 - входной слой, 1..=n - скрытые,
/// последний - выходной. Синапс ссылается на источник по адресу (слой, позиция),
/// поэтому порядок нейронов в слое значим: i-й синапс каждого нейрона слоя L+1
/// связан с i-м нейроном слоя L, последним идет смещение.
#[derive(Clone, Debug)]
pub struct NetworkLayers {
    topology: Vec<LayerTopology>,
    initialization: Initializer,
    layers: Vec<Vec<Neuron>>,
    connected: bool,
}

impl NetworkLayers {
    /// Конструктор. Слои пустые до initialize_layers
    pub fn new(parameters: &Parameters) -> Result<Self> {
        parameters.validate()?;
        Ok(Self {
            topology: parameters.topology(),
            initialization: parameters.initialization,
            layers: Vec::new(),
            connected: false,
        })
    }

    /// Создание нейронов всех слоев
    pub fn initialize_layers(&mut self) -> Result<()> {
        if !self.layers.is_empty() {
            return Err(NetworkError::InvalidState("layers are already initialized".into()));
        }
        self.layers = self.topology
            .iter()
            .map(|layer| (0..layer.neurons).map(|_| Neuron::new(layer.activation)).collect())
            .collect();
        debug!(sizes = ?self.sizes(), "network layers initialized");
        Ok(())
    }

    /// Полное соединение слоев. Начальные веса - initialization(размер предыдущего слоя)
    pub fn connect_layers(&mut self, rng: &mut dyn RngCore) -> Result<()> {
        if self.layers.is_empty() {
            return Err(NetworkError::InvalidState(
                "layers must be initialized before they are connected".into()
            ));
        }
        if self.connected {
            return Err(NetworkError::InvalidState("layers are already connected".into()));
        }
        //входной слой: одна связь без источника, через нее подается вход
        for neuron in &mut self.layers[0] {
            neuron.set_inputs(vec![Synapse::input()]);
        }
        //скрытые и выходной слой: связь с каждым нейроном предыдущего слоя + смещение
        let initialization = self.initialization;
        for layer_num in 1..self.layers.len() {
            let previous_size = self.layers[layer_num - 1].len();
            for neuron in &mut self.layers[layer_num] {
                let mut synapses: Vec<Synapse> = (0..previous_size)
                    .map(|p| Synapse::new(
                        initialization.apply(rng, previous_size),
                        NeuronId::new(layer_num - 1, p),
                    ))
                    .collect();
                synapses.push(Synapse::bias(initialization.apply(rng, previous_size)));
                neuron.set_inputs(synapses);
            }
        }
        self.connected = true;
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
    /// Ошибка, если сеть не готова к расчету
    pub fn ensure_connected(&self) -> Result<()> {
        if self.connected {
            Ok(())
        } else {
            Err(NetworkError::InvalidState("network layers are not initialized and connected".into()))
        }
    }

    /// Количество нейронов по слоям
    pub fn sizes(&self) -> Vec<usize> {
        self.layers.iter().map(|layer| layer.len()).collect()
    }
    pub fn layers(&self) -> &[Vec<Neuron>] {
        &self.layers
    }
    pub fn layer(&self, layer_num: usize) -> Option<&[Neuron]> {
        self.layers.get(layer_num).map(|layer| layer.as_slice())
    }
    pub fn input_layer(&self) -> &[Neuron] {
        self.layers.first().map(Vec::as_slice).unwrap_or_default()
    }
    pub fn hidden_layers(&self) -> &[Vec<Neuron>] {
        if self.layers.len() > 2 {
            &self.layers[1..self.layers.len() - 1]
        } else {
            &[]
        }
    }
    pub fn output_layer(&self) -> &[Neuron] {
        if self.layers.len() > 1 {
            self.layers.last().map(Vec::as_slice).unwrap_or_default()
        } else {
            &[]
        }
    }
    pub(crate) fn layers_mut(&mut self) -> &mut [Vec<Neuron>] {
        &mut self.layers
    }

    /// Последовательность весов послойно (кроме входного слоя, там веса - входы)
    /// состав вых.структуры (вес, №слоя, №нейрона, №синапса)
    pub fn weights(&self) -> impl Iterator<Item = (f64, usize, usize, usize)> + '_ {
        self.layers
            .iter()
            .enumerate()
            .skip(1)
            .flat_map(|(l, layer)| {
                layer.iter().enumerate().flat_map(move |(n, neuron)| {
                    neuron.inputs().iter().enumerate().map(move |(s, synapse)| (synapse.weight(), l, n, s))
                })
            })
    }
}
