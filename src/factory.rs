use crate::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Сборка сети по параметрам: создание слоев, соединение, обвязка обучением
#[derive(Clone, Debug)]
pub struct NeuralNetworkFactory {
    parameters: Parameters,
}

impl NeuralNetworkFactory {
    pub fn new(parameters: Parameters) -> Result<Self> {
        parameters.validate()?;
        Ok(Self { parameters })
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Сеть с начальными весами от генератора ChaCha8 с зерном `parameters.seed`
    pub fn create(&self) -> Result<NeuralNetwork> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.parameters.seed);
        self.create_with_rng(&mut rng)
    }

    /// Сеть с начальными весами от переданного генератора
    pub fn create_with_rng(&self, rng: &mut dyn RngCore) -> Result<NeuralNetwork> {
        let mut layers = NetworkLayers::new(&self.parameters)?;
        layers.initialize_layers()?;
        layers.connect_layers(rng)?;
        debug!(sizes = ?layers.sizes(), "neural network assembled");
        NeuralNetwork::new(&self.parameters, layers)
    }
}
