#[cfg(test)]
mod tests {
    use neuro_prep::types::{IMAGE_FILE_NAME, LABEL_FILE_NAME};
    use neuro_prep::{discover, run, FileNames, PrepareError, RunConfig};
    use std::fs::{self, File};
    use std::path::{Path, PathBuf};

    // (case, person, has image, has label)
    type Layout<'a> = &'a [(&'a str, &'a str, bool, bool)];

    fn build_tree(root: &Path, layout: Layout) {
        for &(case, person, image, label) in layout {
            let person_dir = root.join(case).join(person);
            fs::create_dir_all(&person_dir).unwrap();
            if image {
                File::create(person_dir.join(IMAGE_FILE_NAME)).unwrap();
            }
            if label {
                File::create(person_dir.join(LABEL_FILE_NAME)).unwrap();
            }
        }
    }

    fn five_subjects(root: &Path) {
        build_tree(
            root,
            &[
                ("case_b", "p1", true, true),
                ("case_a", "p3", true, true),
                ("case_a", "p1", true, true),
                ("case_b", "p2", true, true),
                ("case_a", "p2", true, true),
            ],
        );
    }

    fn read_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_discover_pairs_in_sorted_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        five_subjects(root);

        let discovery = discover(root, &FileNames::default()).unwrap();
        let persons: Vec<PathBuf> = discovery
            .cases
            .iter()
            .map(|case| case.images.parent().unwrap().strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            persons,
            vec![
                PathBuf::from("case_a/p1"),
                PathBuf::from("case_a/p2"),
                PathBuf::from("case_a/p3"),
                PathBuf::from("case_b/p1"),
                PathBuf::from("case_b/p2"),
            ]
        );
        for case in &discovery.cases {
            assert_eq!(case.images.parent(), case.labels.parent());
            assert_eq!(case.images.file_name().unwrap(), IMAGE_FILE_NAME);
            assert_eq!(case.labels.file_name().unwrap(), LABEL_FILE_NAME);
        }
        assert_eq!(discovery.stats.case_dirs, 2);
        assert_eq!(discovery.stats.person_dirs, 5);
        assert_eq!(discovery.stats.matched_pairs, 5);
    }

    #[test]
    fn test_discover_is_idempotent() {
        let temp_dir = tempfile::tempdir().unwrap();
        five_subjects(temp_dir.path());

        let first = discover(temp_dir.path(), &FileNames::default()).unwrap();
        let second = discover(temp_dir.path(), &FileNames::default()).unwrap();
        assert_eq!(first.cases, second.cases);
    }

    #[test]
    fn test_discover_ignores_unrelated_entries() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        build_tree(
            root,
            &[("case_a", "p1", true, true), ("case_a", "empty", false, false)],
        );
        File::create(root.join("README.txt")).unwrap();
        File::create(root.join("case_a").join("notes.txt")).unwrap();
        File::create(root.join("case_a/p1/t1weighted.nii.gz")).unwrap();
        fs::create_dir_all(root.join("case_a/p1/extra")).unwrap();

        let discovery = discover(root, &FileNames::default()).unwrap();
        assert_eq!(discovery.cases.len(), 1);
        assert_eq!(discovery.stats.skipped_empty, 1);
        assert_eq!(discovery.stats.person_dirs, 2);
    }

    #[test]
    fn test_discover_custom_file_names() {
        let temp_dir = tempfile::tempdir().unwrap();
        let person_dir = temp_dir.path().join("case").join("subject");
        fs::create_dir_all(&person_dir).unwrap();
        File::create(person_dir.join("brain.nii")).unwrap();
        File::create(person_dir.join("seg.nii")).unwrap();

        let names = FileNames {
            image: "brain.nii".to_string(),
            label: "seg.nii".to_string(),
        };
        let discovery = discover(temp_dir.path(), &names).unwrap();
        assert_eq!(discovery.cases.len(), 1);
        assert_eq!(discovery.cases[0].images, person_dir.join("brain.nii"));
        assert_eq!(discovery.cases[0].labels, person_dir.join("seg.nii"));
    }

    #[test]
    fn test_discover_image_without_label() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        build_tree(
            root,
            &[
                ("case_a", "p1", true, true),
                ("case_a", "p2", true, false),
                ("case_b", "p1", true, true),
            ],
        );

        match discover(root, &FileNames::default()) {
            Err(PrepareError::PairingMismatch {
                images,
                labels,
                first_unpaired,
            }) => {
                assert_eq!(images, 3);
                assert_eq!(labels, 2);
                assert_eq!(first_unpaired, root.join("case_a").join("p2"));
            }
            other => panic!("expected a pairing mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_discover_label_without_image() {
        let temp_dir = tempfile::tempdir().unwrap();
        build_tree(temp_dir.path(), &[("case_a", "p1", false, true)]);

        assert!(matches!(
            discover(temp_dir.path(), &FileNames::default()),
            Err(PrepareError::PairingMismatch {
                images: 0,
                labels: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_discover_missing_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("does_not_exist");
        assert!(matches!(
            discover(&missing, &FileNames::default()),
            Err(PrepareError::Discovery { .. })
        ));

        let file = temp_dir.path().join("file.nii");
        File::create(&file).unwrap();
        assert!(matches!(
            discover(&file, &FileNames::default()),
            Err(PrepareError::Discovery { .. })
        ));
    }

    #[test]
    fn test_run_writes_manifests() {
        let data_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        five_subjects(data_dir.path());

        let output_dir = out_dir.path().join("data");
        let mut config = RunConfig::new(data_dir.path(), &output_dir, 3);
        config.seed = Some(7);
        let summary = run(&config).unwrap();

        assert_eq!(summary.cases, 5);
        assert_eq!(summary.train_rows, 12);
        assert_eq!(summary.valid_rows, 1);
        assert_eq!(summary.total_rows(), 13);
        assert_eq!(summary.seed, 7);

        let mut reader = csv::Reader::from_path(&summary.outputs.dataset).unwrap();
        let headers: Vec<String> = reader
            .headers()
            .unwrap()
            .iter()
            .map(str::to_string)
            .collect();
        assert_eq!(headers, vec!["images", "labels", "coords", "split"]);
        let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(records.len(), 13);
        let splits: Vec<&str> = records.iter().map(|r| &r[3]).collect();
        assert_eq!(splits[..12], ["0"; 12]);
        assert_eq!(splits[12], "1");
        for record in &records {
            assert!(record[2].starts_with("[[") && record[2].ends_with("]]"));
        }

        let train = read_lines(&output_dir.join("dataset_train.csv"));
        assert_eq!(train.len(), 13);
        assert_eq!(train[0], "images,labels,coords");

        let valid = read_lines(&output_dir.join("dataset_valid.csv"));
        assert_eq!(valid.len(), 2);
        assert_eq!(valid[0], "images,labels,coords");

        let last_person = data_dir.path().join("case_b").join("p2");
        let infer = read_lines(&output_dir.join("dataset_infer.csv"));
        assert_eq!(
            infer,
            vec![
                last_person.join(IMAGE_FILE_NAME).display().to_string(),
                last_person.join(LABEL_FILE_NAME).display().to_string(),
            ]
        );
    }

    #[test]
    fn test_run_is_reproducible_with_seed() {
        let data_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        five_subjects(data_dir.path());

        let mut first = RunConfig::new(data_dir.path(), out_dir.path().join("first"), 4);
        first.seed = Some(2024);
        let mut second = first.clone();
        second.output_dir = out_dir.path().join("second");

        let first = run(&first).unwrap();
        let second = run(&second).unwrap();
        assert_eq!(
            fs::read_to_string(first.outputs.dataset).unwrap(),
            fs::read_to_string(second.outputs.dataset).unwrap()
        );
    }

    #[test]
    fn test_run_empty_root_fails_without_output() {
        let data_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let output_dir = out_dir.path().join("data");

        let config = RunConfig::new(data_dir.path(), &output_dir, 3);
        assert!(matches!(run(&config), Err(PrepareError::EmptyManifest)));
        assert!(!output_dir.join("dataset.csv").exists());
    }

    #[test]
    fn test_run_single_case_has_empty_train_split() {
        let data_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        build_tree(data_dir.path(), &[("case", "only", true, true)]);

        let mut config = RunConfig::new(data_dir.path(), out_dir.path(), 5);
        config.seed = Some(1);
        let summary = run(&config).unwrap();

        assert_eq!(summary.train_rows, 0);
        assert_eq!(summary.valid_rows, 1);
        assert_eq!(
            read_lines(&summary.outputs.train),
            vec!["images,labels,coords".to_string()]
        );
    }
}
