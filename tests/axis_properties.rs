use std::fs;

use proptest::prelude::*;

use trial_plotter::data::{self, SourceDescriptor};

const FILE: &str = "values.txt";

/// Per test: `None` for a missing source, else its (timestamp, value) lines.
fn sources_strategy() -> impl Strategy<Value = Vec<Option<Vec<(i32, i32)>>>> {
    prop::collection::vec(
        prop::option::of(prop::collection::vec((0i32..50, -100i32..100), 0..12)),
        0..6,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn axis_is_sorted_union_of_present_sources(sources in sources_strategy()) {
        let tmp = tempfile::tempdir().unwrap();
        let mut names = Vec::new();
        let mut expected_axis: Vec<f64> = Vec::new();
        let mut expected_values: Vec<Vec<f64>> = Vec::new();

        for (i, source) in sources.iter().enumerate() {
            let name = format!("test {i}");
            if let Some(lines) = source {
                let dir = tmp.path().join(&name);
                fs::create_dir_all(&dir).unwrap();
                let body: String = lines
                    .iter()
                    .map(|(t, v)| format!("{}.25 {}.5\n", t, v))
                    .collect();
                fs::write(dir.join(FILE), body).unwrap();

                expected_axis.extend(lines.iter().map(|(t, _)| *t as f64 + 0.25));
                expected_values.push(lines.iter().map(|(_, v)| format!("{v}.5").parse().unwrap()).collect());
            }
            names.push(name);
        }
        expected_axis.sort_by(f64::total_cmp);
        expected_axis.dedup();

        let descriptors = SourceDescriptor::for_tests(names, FILE);
        let series = data::load(tmp.path(), &descriptors).unwrap();

        let present = sources.iter().filter(|s| s.is_some()).count();
        prop_assert_eq!(series.len(), present);
        prop_assert!(series.time_axis.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(&series.time_axis, &expected_axis);
        let values: Vec<Vec<f64>> = series.datasets.iter().map(|d| d.values.clone()).collect();
        prop_assert_eq!(values, expected_values);

        let again = data::load(tmp.path(), &descriptors).unwrap();
        prop_assert_eq!(again, series);
    }
}
