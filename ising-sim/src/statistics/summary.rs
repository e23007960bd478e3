use super::stats::Statistics;

/// Plain averages of a magnetization window. No error bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub n_samples: usize,
    /// ⟨m⟩
    pub mean: f64,
    /// ⟨|m|⟩
    pub mean_abs: f64,
    /// ⟨m²⟩
    pub mean_sq: f64,
}

pub fn summarize(values: &[f64]) -> Summary {
    let mut m = Statistics::new(1);
    let mut m_abs = Statistics::new(1);
    let mut m2 = Statistics::new(2);
    for &v in values {
        m.update(v);
        m_abs.update(v.abs());
        m2.update(v);
    }
    Summary {
        n_samples: values.len(),
        mean: m.average(),
        mean_abs: m_abs.average(),
        mean_sq: m2.average(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize() {
        let s = summarize(&[0.5, -0.5, 1.0, -1.0]);
        assert_eq!(s.n_samples, 4);
        assert_eq!(s.mean, 0.0);
        assert_eq!(s.mean_abs, 0.75);
        assert_eq!(s.mean_sq, 0.625);
    }

    #[test]
    fn test_empty_window() {
        let s = summarize(&[]);
        assert_eq!(s.n_samples, 0);
        assert_eq!(s.mean, 0.0);
        assert_eq!(s.mean_sq, 0.0);
    }
}
