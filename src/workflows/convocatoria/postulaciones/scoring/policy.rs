use super::super::domain::Recommendation;
use super::config::ScoringConfig;

/// Derive the coarse recommendation from the total score.
///
/// An unevaluated postulación is never auto-rejected: with no scored
/// category the answer is pendiente regardless of the zero total.
pub(crate) fn recommend(total: f64, scored: bool, config: &ScoringConfig) -> Recommendation {
    if !scored {
        return Recommendation::Pendiente;
    }
    if total >= config.approve_threshold {
        Recommendation::Aprobado
    } else if total < config.reject_threshold {
        Recommendation::Rechazado
    } else {
        Recommendation::Pendiente
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_partition_the_scale() {
        let config = ScoringConfig::default();
        assert_eq!(recommend(70.0, true, &config), Recommendation::Aprobado);
        assert_eq!(recommend(69.9, true, &config), Recommendation::Pendiente);
        assert_eq!(recommend(40.0, true, &config), Recommendation::Pendiente);
        assert_eq!(recommend(39.9, true, &config), Recommendation::Rechazado);
        assert_eq!(recommend(0.0, true, &config), Recommendation::Rechazado);
    }

    #[test]
    fn unscored_total_is_pendiente_not_rechazado() {
        let config = ScoringConfig::default();
        assert_eq!(recommend(0.0, false, &config), Recommendation::Pendiente);
    }
}
