// src/domain/errors.rs
use thiserror::Error;

// Display strings on the pipeline errors are the user-facing messages shown by
// the front end, hence the French wording. Raw status codes and upstream parse
// errors stay in the logs.

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Feed(#[from] FeedError),

    #[error("{0}")]
    Export(#[from] ExportError),

    #[error("{0}")]
    Analysis(#[from] AnalysisError),

    #[error("Erreur de configuration : {0}")]
    Config(String),

    #[error("Erreur d'entrée/sortie : {0}")]
    Io(#[from] std::io::Error),

    #[error("Erreur de sérialisation : {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Erreur réseau lors de la récupération du flux : {0}")]
    Network(String),

    #[error("Flux de nouvelles illisible : {0}")]
    Parse(String),

    #[error("Aucune nouvelle disponible")]
    Empty,
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Veuillez vous connecter à eTRACE")]
    NotAuthenticated,

    #[error("Accès non autorisé. Veuillez vous reconnecter à eTRACE")]
    Forbidden,

    #[error("Fichier non trouvé")]
    NotFound,

    #[error("Le serveur eTRACE est temporairement indisponible")]
    Unavailable,

    /// Any other non-2xx status. The code is kept for the logs, never shown.
    #[error("Erreur lors du téléchargement du fichier")]
    Download(u16),

    #[error("Le téléchargement a pris trop de temps. Veuillez réessayer.")]
    Timeout,

    #[error("Erreur réseau. Veuillez vérifier votre connexion internet.")]
    Network,

    #[error("Le fichier téléchargé est vide")]
    EmptyFile,

    #[error("Le fichier ne contient pas de données valides")]
    NoData,

    #[error("Le format du fichier n'est pas valide. Veuillez vérifier que vous êtes connecté à eTRACE.")]
    InvalidFormat,

    #[error("Nombre maximum de tentatives atteint. Veuillez réessayer plus tard.")]
    MaxAttempts,
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Clé API manquante. Renseignez-la dans les réglages")]
    MissingApiKey,

    #[error("Aucune nouvelle à analyser")]
    NoNews,

    #[error("Une analyse est déjà en cours")]
    AlreadyRunning,

    /// Cooldown not elapsed; carries the remaining wait in seconds.
    #[error("Veuillez attendre {0} secondes avant la prochaine analyse")]
    Cooldown(u64),

    #[error("Erreur OpenAI : {0}")]
    Api(String),

    #[error("Réponse invalide : aucun objet JSON trouvé")]
    NoJsonObject,

    #[error("Erreur de parsing : {0}")]
    Parse(String),

    #[error("Validation échouée : {0}")]
    Validation(String),

    #[error("Erreur réseau lors de l'appel au modèle : {0}")]
    Network(String),
}

// Result type aliases for convenience
pub type AppResult<T> = Result<T, AppError>;
pub type FeedResult<T> = Result<T, FeedError>;
pub type ExportResult<T> = Result<T, ExportError>;
pub type AnalysisResult<T> = Result<T, AnalysisError>;
