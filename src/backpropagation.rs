use crate::*;

/// Обратное распространение ошибки с коэффициентом обучения и моментом.
///
/// Сначала рассчитываются дельты всех слоев (выходной, затем скрытые справа налево),
/// и только потом обновляются веса: дельты скрытого слоя читают веса следующего слоя
/// до их изменения. Смещения и связи входного слоя не обучаются.
#[derive(Clone, Copy, Debug)]
pub struct Backpropagation {
    momentum: f64,
    learning_rate: f64,
    derivative: Derivative,
    output_derivative: Derivative,
}

impl Backpropagation {
    pub fn new(parameters: &Parameters) -> Self {
        Self {
            momentum: parameters.momentum,
            learning_rate: parameters.learning_rate,
            derivative: parameters.derivative,
            output_derivative: parameters.output_derivative,
        }
    }

    /// Один шаг обучения по целевому вектору. Выходы нейронов должны быть
    /// рассчитаны прямым распространением того же примера.
    pub fn apply(&self, layers: &mut NetworkLayers, targets: &[f64]) -> Result<()> {
        layers.ensure_connected()?;
        let expected = layers.output_layer().len();
        if targets.len() != expected {
            return Err(NetworkError::ShapeMismatch { what: "targets", expected, actual: targets.len() });
        }
        self.calculate_deltas_of_all_layers(layers.layers_mut(), targets)?;
        Self::update_weights(layers.layers_mut());
        Ok(())
    }

    fn calculate_deltas_of_all_layers(&self, layers: &mut [Vec<Neuron>], targets: &[f64]) -> Result<()> {
        let output_num = layers.len() - 1;
        self.calculate_deltas_of_output_layer(layers, output_num, targets)?;
        //скрытые слои строго справа налево
        for layer_num in (1..output_num).rev() {
            self.calculate_deltas_of_hidden_layer(layers, layer_num)?;
        }
        Ok(())
    }

    fn calculate_deltas_of_output_layer(
        &self,
        layers: &mut [Vec<Neuron>],
        output_num: usize,
        targets: &[f64],
    ) -> Result<()> {
        let (upstream, rest) = layers.split_at_mut(output_num);
        let previous_layer = &upstream[output_num - 1];
        let previous_outs = Self::outputs(previous_layer)?;

        for (neuron, target) in rest[0].iter_mut().zip(targets) {
            let out = neuron.computed_output()?;
            let error_signal = out - target;
            //смещение (последний синапс) пропускается
            for (synapse, previous_out) in neuron.inputs_mut().iter_mut().zip(&previous_outs) {
                let delta = self.learning_rate
                    * error_signal
                    * self.output_derivative.apply(out)
                    * previous_out;
                synapse.record_delta(delta, self.momentum);
            }
        }
        Ok(())
    }

    fn calculate_deltas_of_hidden_layer(&self, layers: &mut [Vec<Neuron>], layer_num: usize) -> Result<()> {
        let (upstream, rest) = layers.split_at_mut(layer_num);
        let (current, downstream) = rest.split_at_mut(1);
        let previous_outs = Self::outputs(&upstream[layer_num - 1])?;
        let next_layer = &downstream[0];

        for (h, neuron) in current[0].iter_mut().enumerate() {
            let hidden_out = neuron.computed_output()?;
            //ошибка, пришедшая от следующего слоя через синапсы с номером h
            let mut total_output = 0.0;
            for next in next_layer {
                let synapse = next.inputs().get(h).ok_or_else(|| NetworkError::InvalidState(
                    format!("next layer neuron has no synapse at position {h}")
                ))?;
                let error_signal = synapse.weight() * synapse.delta();
                total_output += error_signal * self.derivative.apply(next.computed_output()?);
            }
            for (synapse, previous_out) in neuron.inputs_mut().iter_mut().zip(&previous_outs) {
                let delta = self.learning_rate
                    * total_output
                    * (self.derivative.apply(hidden_out) * previous_out);
                synapse.record_delta(delta, self.momentum);
            }
        }
        Ok(())
    }

    /// weight -= delta_weight для скрытых и выходного слоя
    fn update_weights(layers: &mut [Vec<Neuron>]) {
        layers
            .iter_mut()
            .skip(1)
            .flat_map(|layer| layer.iter_mut())
            .flat_map(|neuron| neuron.inputs_mut().iter_mut())
            .for_each(|synapse| synapse.update_weight());
    }

    fn outputs(layer: &[Neuron]) -> Result<Vec<f64>> {
        layer.iter().map(|neuron| neuron.computed_output()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn connected(parameters: &Parameters) -> NetworkLayers {
        let mut rng = ChaCha8Rng::seed_from_u64(parameters.seed);
        let mut layers = NetworkLayers::new(parameters).unwrap();
        layers.initialize_layers().unwrap();
        layers.connect_layers(&mut rng).unwrap();
        layers
    }

    fn error(layers: &NetworkLayers, targets: &[f64]) -> f64 {
        layers.output_layer()
            .iter()
            .zip(targets)
            .map(|(n, t)| ErrorFunction::HalfSquared.apply(n.output().unwrap(), *t))
            .sum()
    }

    #[test]
    fn output_layer_deltas() {
        let p = Parameters {
            learning_rate: 0.5,
            initialization: Initializer::Constant(0.2),
            ..Parameters::new(2, 1, 2, 1)
        };
        let mut layers = connected(&p);
        FeedForward::new().apply(&mut layers, &[1.0, 0.0]).unwrap();
        let hidden: Vec<f64> = layers.hidden_layers()[0].iter().map(|n| n.output().unwrap()).collect();
        let out = layers.output_layer()[0].output().unwrap();

        Backpropagation::new(&p).apply(&mut layers, &[1.0]).unwrap();

        let synapses = layers.output_layer()[0].inputs();
        for (synapse, h) in synapses.iter().zip(&hidden) {
            let delta = 0.5 * (out - 1.0) * (out * (1.0 - out)) * h;
            assert_relative_eq!(synapse.delta(), delta);
            assert_relative_eq!(synapse.delta_weight(), delta);
            assert_relative_eq!(synapse.weight(), 0.2 - delta);
        }
        //смещение не обучается
        let bias = synapses.last().unwrap();
        assert!(bias.is_bias());
        assert_relative_eq!(bias.delta_weight(), 0.0);
        assert_relative_eq!(bias.weight(), 0.2);
    }

    #[test]
    fn hidden_deltas_use_weights_before_update() {
        let p = Parameters {
            learning_rate: 0.8,
            ..Parameters::new(2, 1, 3, 2)
        };
        let mut layers = connected(&p);
        let targets = [0.0, 1.0];
        FeedForward::new().apply(&mut layers, &[0.4, -0.9]).unwrap();

        let before = layers.clone();
        Backpropagation::new(&p).apply(&mut layers, &targets).unwrap();

        let d = |y: f64| y * (1.0 - y);
        let inputs: Vec<f64> = before.input_layer().iter().map(|n| n.output().unwrap()).collect();
        let output_before = before.output_layer();
        let output_after = layers.output_layer();

        for (h, neuron) in before.hidden_layers()[0].iter().enumerate() {
            let hidden_out = neuron.output().unwrap();
            //правильный порядок: веса выходного слоя до обновления
            let total: f64 = output_before
                .iter()
                .zip(output_after)
                .map(|(old, new)| old.inputs()[h].weight() * new.inputs()[h].delta() * d(old.output().unwrap()))
                .sum();
            //неправильный порядок: веса выходного слоя уже обновлены
            let total_wrong: f64 = output_after
                .iter()
                .map(|new| new.inputs()[h].weight() * new.inputs()[h].delta() * d(new.output().unwrap()))
                .sum();
            assert!((total - total_wrong).abs() > 1e-12);

            for (p_num, previous_out) in inputs.iter().enumerate() {
                let expected = 0.8 * total * (d(hidden_out) * previous_out);
                let wrong = 0.8 * total_wrong * (d(hidden_out) * previous_out);
                let actual = layers.hidden_layers()[0][h].inputs()[p_num].delta();
                assert_relative_eq!(actual, expected, epsilon = 1e-15);
                assert!((actual - wrong).abs() > 1e-15);

                let old_weight = neuron.inputs()[p_num].weight();
                let new_weight = layers.hidden_layers()[0][h].inputs()[p_num].weight();
                assert_relative_eq!(new_weight, old_weight - expected, epsilon = 1e-15);
            }
        }
    }

    #[test]
    fn hidden_layers_are_processed_right_to_left() {
        let p = Parameters {
            learning_rate: 0.8,
            ..Parameters::new(2, 2, 3, 2)
        };
        let mut layers = connected(&p);
        FeedForward::new().apply(&mut layers, &[0.4, -0.9]).unwrap();

        //дельт еще нет: первый скрытый слой, посчитанный раньше второго, получил бы нули
        let before = layers.clone();
        Backpropagation::new(&p).apply(&mut layers, &[0.0, 1.0]).unwrap();

        let d = |y: f64| y * (1.0 - y);
        let inputs: Vec<f64> = before.input_layer().iter().map(|n| n.output().unwrap()).collect();
        let second_before = &before.hidden_layers()[1];
        let second_after = &layers.hidden_layers()[1];

        for (h, neuron) in before.hidden_layers()[0].iter().enumerate() {
            let hidden_out = neuron.output().unwrap();
            //свежие дельты второго скрытого слоя и его веса до обновления
            let total: f64 = second_before
                .iter()
                .zip(second_after)
                .map(|(old, new)| old.inputs()[h].weight() * new.inputs()[h].delta() * d(old.output().unwrap()))
                .sum();
            assert!(total.abs() > 1e-12);

            for (p_num, previous_out) in inputs.iter().enumerate() {
                let expected = 0.8 * total * (d(hidden_out) * previous_out);
                let actual = layers.hidden_layers()[0][h].inputs()[p_num].delta();
                assert_relative_eq!(actual, expected, epsilon = 1e-15);
                assert!(actual.abs() > 1e-15);
            }
        }
    }

    #[test]
    fn momentum_accumulates() {
        let p = Parameters {
            momentum: 0.5,
            ..Parameters::new(2, 1, 2, 2)
        };
        let mut layers = connected(&p);
        let bp = Backpropagation::new(&p);

        FeedForward::new().apply(&mut layers, &[1.0, 1.0]).unwrap();
        bp.apply(&mut layers, &[1.0, 0.0]).unwrap();
        let first = layers.output_layer()[0].inputs()[0].delta_weight();

        FeedForward::new().apply(&mut layers, &[1.0, 1.0]).unwrap();
        bp.apply(&mut layers, &[1.0, 0.0]).unwrap();
        let synapse = &layers.output_layer()[0].inputs()[0];
        assert_relative_eq!(synapse.delta_weight(), synapse.delta() + 0.5 * first);
    }

    #[test]
    fn reduces_error_on_one_example() {
        let p = Parameters {
            learning_rate: 0.5,
            ..Parameters::new(2, 1, 3, 2)
        };
        let mut layers = connected(&p);
        let bp = Backpropagation::new(&p);
        let ff = FeedForward::new();
        let (input, targets) = ([1.0, 0.0], [0.0, 1.0]);

        ff.apply(&mut layers, &input).unwrap();
        let mut last = error(&layers, &targets);
        for _ in 0..3 {
            bp.apply(&mut layers, &targets).unwrap();
            ff.apply(&mut layers, &input).unwrap();
            let current = error(&layers, &targets);
            assert!(current < last);
            last = current;
        }
    }

    #[test]
    fn input_layer_is_not_updated() {
        let p = Parameters::new(2, 2, 2, 2);
        let mut layers = connected(&p);
        FeedForward::new().apply(&mut layers, &[0.3, 0.6]).unwrap();
        Backpropagation::new(&p).apply(&mut layers, &[1.0, 0.0]).unwrap();
        let weights: Vec<f64> = layers.input_layer().iter().map(|n| n.inputs()[0].weight()).collect();
        assert_relative_eq!(weights.as_slice(), [0.3, 0.6].as_slice());
    }

    #[test]
    fn preconditions() {
        let p = Parameters::new(2, 1, 2, 3);
        let bp = Backpropagation::new(&p);

        let mut layers = NetworkLayers::new(&p).unwrap();
        assert!(matches!(bp.apply(&mut layers, &[0.0, 1.0, 0.0]), Err(NetworkError::InvalidState(_))));

        let mut layers = connected(&p);
        //прямого прохода еще не было
        assert!(matches!(bp.apply(&mut layers, &[0.0, 1.0, 0.0]), Err(NetworkError::InvalidState(_))));

        FeedForward::new().apply(&mut layers, &[0.0, 1.0]).unwrap();
        let err = bp.apply(&mut layers, &[0.0, 1.0]).unwrap_err();
        assert_eq!(err, NetworkError::ShapeMismatch { what: "targets", expected: 3, actual: 2 });
    }
}
