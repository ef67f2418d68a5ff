use crate::*;
use rand::Rng;
use rand_distr::StandardNormal;

/// Функция активации нейрона
#[derive(Clone, Copy, Debug)]
pub enum Activation {
    /// Логистическая функция 1/(1+e^-x)
    Sigmoid,
    Identity,
    Tanh,
    Relu,
    Custom(fn(f64) -> f64),
}

impl Activation {
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Identity => x,
            Activation::Tanh => x.tanh(),
            Activation::Relu => x.max(0.0),
            Activation::Custom(f) => f(x),
        }
    }
    /// Производная, согласованная с функцией активации.
    /// Для Custom согласованной пары нет - берется Derivative::Identity.
    pub fn derivative(&self) -> Derivative {
        match self {
            Activation::Sigmoid => Derivative::Sigmoid,
            Activation::Identity | Activation::Custom(_) => Derivative::Identity,
            Activation::Tanh => Derivative::Tanh,
            Activation::Relu => Derivative::Relu,
        }
    }
}

/// Производная функции активации, выраженная через ВЫХОД нейрона y = f(x), а не через x.
///
/// При обучении производная вызывается от уже рассчитанного выхода нейрона,
/// поэтому пользовательская пара (Activation::Custom, Derivative::Custom)
/// должна быть записана в этой же форме.
#[derive(Clone, Copy, Debug)]
pub enum Derivative {
    /// y*(1-y)
    Sigmoid,
    /// 1
    Identity,
    /// 1-y^2
    Tanh,
    /// 1 при y>0, иначе 0
    Relu,
    Custom(fn(f64) -> f64),
}

impl Derivative {
    pub fn apply(&self, y: f64) -> f64 {
        match self {
            Derivative::Sigmoid => y * (1.0 - y),
            Derivative::Identity => 1.0,
            Derivative::Tanh => 1.0 - y * y,
            Derivative::Relu => if y > 0.0 { 1.0 } else { 0.0 },
            Derivative::Custom(f) => f(y),
        }
    }
}

/// Начальное значение веса. Аргумент - размер предыдущего слоя
#[derive(Clone, Copy, Debug)]
pub enum Initializer {
    /// N(0,1) * 1/n
    XavierNormal,
    /// Равномерно в [-a, a]
    Uniform(f64),
    Constant(f64),
    Custom(fn(&mut dyn RngCore, usize) -> f64),
}

impl Initializer {
    pub fn apply(&self, rng: &mut dyn RngCore, previous_layer_size: usize) -> f64 {
        match self {
            Initializer::XavierNormal => {
                let z: f64 = rng.sample(StandardNormal);
                z * (1.0 / previous_layer_size as f64)
            }
            Initializer::Uniform(a) => {
                let a = a.abs();
                if a == 0.0 { 0.0 } else { rng.gen_range(-a..=a) }
            }
            Initializer::Constant(w) => *w,
            Initializer::Custom(f) => f(rng, previous_layer_size),
        }
    }
}

/// Ошибка одного выхода сети: (выход, цель)
#[derive(Clone, Copy, Debug)]
pub enum ErrorFunction {
    /// (target-output)^2/2
    HalfSquared,
    Custom(fn(f64, f64) -> f64),
}

impl ErrorFunction {
    pub fn apply(&self, output: f64, target: f64) -> f64 {
        match self {
            ErrorFunction::HalfSquared => (target - output).powi(2) / 2.0,
            ErrorFunction::Custom(f) => f(output, target),
        }
    }
}
