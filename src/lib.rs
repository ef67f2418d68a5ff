//! Полносвязная нейронная сеть прямого распространения для классификации,
//! обучаемая методом обратного распространения ошибки (online, с моментом).
//!
//! Сеть собирается только через [`NeuralNetworkFactory`]:
//! ```no_run
//! use lib_backprop_network::{NetworkError, NeuralNetworkFactory, Parameters};
//!
//! let parameters = Parameters::new(2, 1, 4, 2);
//! let mut network = NeuralNetworkFactory::new(parameters)?.create()?;
//! network.learn(&[vec![0.0, 1.0], vec![1.0, 1.0]], &[1, 0])?;
//! let _output = network.get_output(&[0.0, 1.0])?;
//! # Ok::<(), NetworkError>(())
//! ```

pub use self::{
    backpropagation::*, error::*, factory::*, feed_forward::*, functions::*,
    layer_topology::*, network_layers::*, neural_network::*, neuron::*, parameters::*,
    synapse::*,
};

use itertools::Itertools;
use rand::RngCore;

mod backpropagation;
mod error;
mod factory;
mod feed_forward;
mod functions;
mod layer_topology;
mod network_layers;
mod neural_network;
mod neuron;
mod parameters;
mod synapse;
