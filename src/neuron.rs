use crate::*;

/// Нейрон: функция активации, упорядоченный список входных синапсов и последний выход
#[derive(Clone, Debug)]
pub struct Neuron {
    activation: Activation,
    inputs: Vec<Synapse>,
    /// None - выход еще не рассчитывался
    output: Option<f64>,
}

impl Neuron {
    pub fn new(activation: Activation) -> Self {
        Self { activation, inputs: Vec::new(), output: None }
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }
    pub fn inputs(&self) -> &[Synapse] {
        &self.inputs
    }
    pub fn output(&self) -> Option<f64> {
        self.output
    }

    /// Выход: f(сумма вкладов всех входных синапсов)
    pub fn calculate_output(&mut self, upstream: &[Vec<Neuron>]) -> Result<f64> {
        let sum = self.inputs
            .iter()
            .map(|synapse| synapse.product(upstream))
            .sum::<Result<f64>>()?;
        let output = self.activation.apply(sum);
        self.output = Some(output);
        Ok(output)
    }

    pub(crate) fn computed_output(&self) -> Result<f64> {
        self.output.ok_or_else(|| {
            NetworkError::InvalidState("neuron output requested before feed-forward".into())
        })
    }
    pub(crate) fn set_inputs(&mut self, inputs: Vec<Synapse>) {
        self.inputs = inputs;
    }
    pub(crate) fn inputs_mut(&mut self) -> &mut [Synapse] {
        &mut self.inputs
    }
}
