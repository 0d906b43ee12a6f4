//! Grouped-observation input, positional or labelled.

/// Observations grouped by ensemble.
///
/// Ensembles arrive either as an ordered sequence of groups or as an
/// ordered mapping from a display name to a group. Labels are kept purely
/// for downstream display; computation always goes through the
/// label-stripped [`Groups::groups`] view.
///
/// # Examples
///
/// ```
/// use ergodic_core::Groups;
///
/// let anonymous = Groups::from(vec![vec![0.0, 1.0], vec![1.0, 0.0]]);
/// assert_eq!(anonymous.labels(), ["0", "1"]);
///
/// let labelled = Groups::from(vec![
///     ("UK".to_string(), vec![0.0, 0.0, 1.0]),
///     ("US".to_string(), vec![0.0, 1.0]),
/// ]);
/// assert_eq!(labelled.labels(), ["UK", "US"]);
/// ```
#[derive(Debug, Clone, PartialEq, derive_more::From)]
pub enum Groups {
    /// An ordered sequence of groups, labelled by position.
    Anonymous(Vec<Vec<f64>>),
    /// An ordered mapping from name to group.
    Labeled(Vec<(String, Vec<f64>)>),
}

impl Groups {
    /// The observation groups, with labels stripped.
    #[must_use]
    pub fn groups(&self) -> Vec<&[f64]> {
        match self {
            Self::Anonymous(groups) => groups.iter().map(Vec::as_slice).collect(),
            Self::Labeled(groups) => groups.iter().map(|(_, group)| group.as_slice()).collect(),
        }
    }

    /// Display labels, one per group: the supplied names, or positional
    /// indices for anonymous input.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        match self {
            Self::Anonymous(groups) => (0..groups.len()).map(|i| i.to_string()).collect(),
            Self::Labeled(groups) => groups.iter().map(|(label, _)| label.clone()).collect(),
        }
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Anonymous(groups) => groups.len(),
            Self::Labeled(groups) => groups.len(),
        }
    }

    /// Whether there are no groups at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
