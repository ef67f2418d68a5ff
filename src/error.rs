use thiserror::Error;

/// Ошибки сборки, обучения и расчета сети
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    /// Недопустимые параметры сети
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Длина вектора не совпадает с размером слоя
    #[error("shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Метка класса вне диапазона 0..classes
    #[error("label {label} at position {index} is out of range 0..{classes}")]
    LabelOutOfRange {
        index: usize,
        label: usize,
        classes: usize,
    },

    #[error("training data is empty")]
    EmptyTrainingSet,

    /// Нарушен порядок вызовов (слои не созданы, не соединены и т.п.)
    #[error("invalid state: {0}")]
    InvalidState(String),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
