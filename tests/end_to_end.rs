use gridshield::util::*;
use gridshield::*;
use nalgebra::vector;

fn records_to_bytes(records: &[i64]) -> Vec<u8> {
    bytemuck::cast_slice::<i64, u8>(records).to_vec()
}

#[test]
fn unit_square_2d() {
    let metadata = GridMetadata::new(
        vector![2, 2],
        vector![0.0, 0.0],
        vector![2.0, 2.0],
        vector![1.0, 1.0],
    )
    .unwrap();
    let buffer = GridBuffer::new(records_to_bytes(&[10, 20, 30, 40]));
    let table = GridLookup::new(metadata, buffer).unwrap();

    assert_eq!(table.lookup_2d(0.5, 0.5), 10);
    assert_eq!(table.lookup_2d(1.5, 0.5), 20);
    assert_eq!(table.lookup_2d(0.5, 1.5), 30);
    assert_eq!(table.lookup_2d(1.5, 1.5), 40);
    assert_eq!(table.lookup_2d(2.0, 0.0), -1);
    assert_eq!(table.lookup_2d(-0.1, 0.0), -1);
}

#[test]
fn embedded_grid() {
    static GRID: [u8; 24] = [
        1, 0, 0, 0, 0, 0, 0, 0, //
        2, 0, 0, 0, 0, 0, 0, 0, //
        3, 0, 0, 0, 0, 0, 0, 0,
    ];
    let metadata =
        GridMetadata::from_nominal(vector![3], vector![-1.5], vector![1.5])
            .unwrap()
            .with_byte_order(ByteOrder::Little);
    let table =
        GridLookup::new(metadata, GridBuffer::embedded(&GRID)).unwrap();

    assert_eq!(table.try_lookup_vector(&vector![-1.5]), Some(1));
    assert_eq!(table.try_lookup_vector(&vector![0.0]), Some(2));
    assert_eq!(table.try_lookup_vector(&vector![1.49]), Some(3));
    assert_eq!(table.try_lookup_vector(&vector![1.5]), None);
}

#[test]
fn every_cell_is_reachable_3d() {
    // 4 x 3 x 5 grid where each cell stores its own linear offset
    let metadata = GridMetadata::new(
        vector![4, 3, 5],
        vector![0.0, -3.0, 10.0],
        vector![2.0, 0.0, 12.5],
        vector![0.5, 1.0, 0.5],
    )
    .unwrap();
    let records: Vec<i64> = (0..metadata.total_cells() as i64).collect();
    let buffer = GridBuffer::new(records_to_bytes(&records));
    let table = GridLookup::new(metadata.clone(), buffer).unwrap();

    for bins in metadata.cell_iter() {
        let (min, max) = metadata.cell_bounds(&bins);
        let center: State<3> = (min + max) / 2.0;
        let expected = bins_to_linear(&bins, metadata.size()) as i64;
        assert_eq!(table.try_lookup_vector(&center), Some(expected));
        assert_eq!(table.try_lookup_vector(&min), Some(expected));
        assert_eq!(linear_to_bins(expected as usize, metadata.size()), bins);
    }
}

#[test]
fn construction_errors() {
    let metadata = GridMetadata::new(
        vector![3, 4],
        vector![0.0, 0.0],
        vector![3.0, 4.0],
        vector![1.0, 1.0],
    )
    .unwrap();
    assert_eq!(metadata.buffer_len(), 8 * 12);

    let short = GridBuffer::new(vec![0u8; 8 * 12 - 1]);
    assert!(matches!(
        GridLookup::new(metadata, short),
        Err(ShieldError::BufferSizeMismatch {
            expected: 96,
            actual: 95
        })
    ));

    let zero_size = GridMetadata::new(
        vector![3, 0],
        vector![0.0, 0.0],
        vector![3.0, 4.0],
        vector![1.0, 1.0],
    );
    assert!(matches!(zero_size, Err(ShieldError::InvalidMetadata(_))));
}

#[test]
fn out_of_range_permits_any_action() {
    let metadata = GridMetadata::from_nominal(
        vector![2, 1],
        vector![0.0, 0.0],
        vector![1.0, 1.0],
    )
    .unwrap();
    let table = GridLookup::new(
        metadata,
        GridBuffer::new(records_to_bytes(&[0b01, 0b10])),
    )
    .unwrap();

    let left = ActionSet::from_record(table.lookup_2d(0.25, 0.5));
    assert!(left.allows(0) && !left.allows(1));
    let right = ActionSet::from_record(table.lookup_2d(0.75, 0.5));
    assert!(!right.allows(0) && right.allows(1));
    assert!(ActionSet::from_record(table.lookup_2d(5.0, 0.5)).is_any());
}
