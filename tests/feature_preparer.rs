use feature_prep::backend::{CpuBackend, Tensor1D, Tensor2D};
use feature_prep::model_selection::{
    learning_curve, CvStrategy, Estimator, ModelSelectionError, TrainSizes,
};
use feature_prep::preprocessing::{
    FeaturePreparer, FeaturePreparerConfig, FittedFeaturePreparer, FittedTransformer,
    PreprocessingError, Transformer,
};
use feature_prep::visualization::{plot_learning_curves, LearningCurveOptions};

fn mixed_data(n: usize) -> (Tensor2D<CpuBackend>, Tensor1D<CpuBackend>) {
    let mut rows = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let flag = (i % 2) as f64;
        let a = ((i * 7) % n) as f64 / n as f64;
        let b = ((i * 3) % 11) as f64 * 0.25;
        rows.push(vec![flag, a, b]);
        labels.push(if a + 0.2 * flag > 0.5 { 1.0 } else { 0.0 });
    }
    (Tensor2D::from_rows(&rows), Tensor1D::new(labels))
}

/// Nearest centroid classifier on features prepared by a `FeaturePreparer`.
#[derive(Clone)]
struct PreparedCentroids {
    preparer: FeaturePreparer<CpuBackend>,
    fitted: Option<(FittedFeaturePreparer<CpuBackend>, Vec<Vec<f64>>, Vec<f64>)>,
}

impl PreparedCentroids {
    fn new(preparer: FeaturePreparer<CpuBackend>) -> Self {
        Self {
            preparer,
            fitted: None,
        }
    }
}

fn sq_dist(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

impl Estimator<CpuBackend> for PreparedCentroids {
    fn fit(
        &mut self,
        x: &Tensor2D<CpuBackend>,
        y: &Tensor1D<CpuBackend>,
    ) -> Result<(), ModelSelectionError> {
        let fitted = self.preparer.fit(x)?;
        let prepared = fitted.transform(x)?;
        let (rows, cols) = prepared.shape();
        let values = prepared.ravel();
        let labels = y.to_vec();

        let mut classes: Vec<f64> = labels.clone();
        classes.sort_by(f64::total_cmp);
        classes.dedup();

        let centroids: Vec<Vec<f64>> = classes
            .iter()
            .map(|&class| {
                let members: Vec<usize> = (0..rows).filter(|&r| labels[r] == class).collect();
                (0..cols)
                    .map(|c| {
                        members.iter().map(|&r| values[r * cols + c]).sum::<f64>()
                            / members.len() as f64
                    })
                    .collect()
            })
            .collect();

        self.fitted = Some((fitted, centroids, classes));
        Ok(())
    }

    fn predict(&self, x: &Tensor2D<CpuBackend>) -> Result<Tensor1D<CpuBackend>, ModelSelectionError> {
        let (fitted, centroids, classes) = self
            .fitted
            .as_ref()
            .ok_or_else(|| ModelSelectionError::Estimator("predict before fit".to_string()))?;
        let prepared = fitted.transform(x)?;
        let (rows, cols) = prepared.shape();
        let values = prepared.ravel();

        let predictions = (0..rows)
            .map(|r| {
                let row = &values[r * cols..(r + 1) * cols];
                centroids
                    .iter()
                    .zip(classes)
                    .min_by(|a, b| sq_dist(row, a.0).total_cmp(&sq_dist(row, b.0)))
                    .map(|(_, &class)| class)
                    .unwrap_or(0.0)
            })
            .collect();
        Ok(Tensor1D::new(predictions))
    }
}

#[test]
fn config_driven_preparer_roundtrips_through_disk() {
    let (x, _) = mixed_data(40);
    let config = FeaturePreparerConfig::from_json_str(r#"{"powers": [1, 2, 3, "perm", "log", "exp"]}"#)
        .unwrap();
    let fitted = FeaturePreparer::<CpuBackend>::from_config(config)
        .fit(&x)
        .unwrap();

    assert_eq!(fitted.non_boolean_mask(), &[false, true, true]);
    // 3 identity + 2 squares + 2 cubes + 6 products + 2 logs + 2 exps
    assert_eq!(fitted.n_features_out(), 17);

    let names = fitted.expand_column_names(&["flag", "a", "b"]).unwrap();
    assert_eq!(names.len(), 17);
    assert_eq!(names[16], "exp_b");

    let path = std::env::temp_dir().join("feature_prep_integration_preparer.bin");
    fitted.save_to_file(&path).unwrap();
    let loaded = FittedFeaturePreparer::<CpuBackend>::load_from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let (new_x, _) = mixed_data(15);
    assert_eq!(
        loaded.transform(&new_x).unwrap().ravel(),
        fitted.transform(&new_x).unwrap().ravel()
    );
}

#[test]
fn transform_rejects_other_layouts() {
    let (x, _) = mixed_data(20);
    let fitted = FeaturePreparer::<CpuBackend>::new().fit(&x).unwrap();
    let narrower = Tensor2D::<CpuBackend>::from_rows(&[vec![1.0, 2.0]]);
    assert!(matches!(
        fitted.transform(&narrower),
        Err(PreprocessingError::FeatureMismatch {
            expected_features: 3,
            got_features: 2
        })
    ));
}

#[test]
fn learning_curve_over_prepared_features() {
    let (x, y) = mixed_data(60);
    let estimator = PreparedCentroids::new(FeaturePreparer::with_powers(
        FeaturePreparerConfig::from_tokens(["1", "2"]).unwrap().powers,
    ));

    let curve = learning_curve(
        &estimator,
        &x,
        &y,
        &CvStrategy::from(3),
        &TrainSizes::Fractions(vec![0.25, 0.5, 1.0]),
    )
    .unwrap();

    assert_eq!(curve.train_sizes, vec![10, 20, 40]);
    for row in curve.train_scores.iter().chain(&curve.test_scores) {
        assert_eq!(row.len(), 3);
        assert!(row.iter().all(|s| (0.0..=1.0).contains(s)));
    }
}

#[test]
fn preprocessing_failures_surface_through_learning_curves() {
    // too few rows in a training prefix to find a non-boolean column
    let (x, y) = mixed_data(12);
    let estimator = PreparedCentroids::new(FeaturePreparer::with_powers(
        FeaturePreparerConfig::from_tokens(["2"]).unwrap().powers,
    ));
    let result = learning_curve(
        &estimator,
        &x,
        &y,
        &CvStrategy::from(3),
        &TrainSizes::Absolute(vec![2]),
    );
    assert!(matches!(
        result,
        Err(ModelSelectionError::Preprocessing(PreprocessingError::EmptyData(_)))
    ));
}

#[test]
fn learning_curves_chart() {
    let (x, y) = mixed_data(45);
    let estimator = PreparedCentroids::new(FeaturePreparer::new());
    let plot = plot_learning_curves(
        &estimator,
        &x,
        &y,
        "centroids",
        &LearningCurveOptions::default().with_cv(5),
    )
    .unwrap();

    assert!(plot.title.starts_with("centroids (accuracy="));
    assert_eq!(plot.ylim, (0.6, 1.0));
    assert_eq!(plot.curves.len(), 2);
    assert_eq!(plot.bands.len(), 2);
    assert!(plot.to_svg().contains("Cv score"));
}
