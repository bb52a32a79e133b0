// Overlap packer
// Packs overlapping sibling intervals into non-overlapping display columns

/// One sibling interval on the normalized minute scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackItem {
    pub id: i64,
    pub start_min: i32,
    pub end_min: i32,
}

impl PackItem {
    pub fn new(id: i64, start_min: i32, end_min: i32) -> Self {
        Self {
            id,
            start_min,
            end_min,
        }
    }

    /// End used for clustering and column fit. Milestones occupy one
    /// synthetic minute so a milestone inside a span, or two milestones at
    /// the same instant, count as overlapping; an interval touching the
    /// cluster watermark still starts a new cluster.
    fn effective_end(&self) -> i32 {
        self.end_min.max(self.start_min + 1)
    }

    fn duration(&self) -> i32 {
        self.end_min - self.start_min
    }
}

/// Column placement for one interval within its overlap cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedColumn {
    pub id: i64,
    pub column_index: usize,
    pub column_count: usize,
}

impl PackedColumn {
    /// Left edge as a percentage of the parent band.
    pub fn left_pct(&self) -> f32 {
        self.column_index as f32 / self.column_count as f32 * 100.0
    }

    /// Width as a percentage of the parent band.
    pub fn width_pct(&self) -> f32 {
        100.0 / self.column_count as f32
    }
}

/// Assign every interval a column such that no two intervals sharing a
/// column overlap in time.
///
/// Intervals are grouped into clusters of transitively connected overlaps;
/// within a cluster, columns are filled greedy first-fit by end time, which
/// yields the minimal column count for interval graphs. Sorting is start
/// ascending with longer intervals first on ties (ids break remaining ties),
/// so output is deterministic and stable under equal inputs.
pub fn pack_columns(items: &[PackItem]) -> Vec<PackedColumn> {
    let mut sorted: Vec<&PackItem> = items.iter().collect();
    sorted.sort_by(|a, b| {
        a.start_min
            .cmp(&b.start_min)
            .then(b.duration().cmp(&a.duration()))
            .then(a.id.cmp(&b.id))
    });

    let mut packed = Vec::with_capacity(items.len());
    let mut cluster: Vec<&PackItem> = Vec::new();
    let mut watermark = i32::MIN;

    for item in sorted {
        if !cluster.is_empty() && item.start_min >= watermark {
            pack_cluster(&cluster, &mut packed);
            cluster.clear();
        }
        watermark = watermark.max(item.effective_end());
        cluster.push(item);
    }
    if !cluster.is_empty() {
        pack_cluster(&cluster, &mut packed);
    }

    packed
}

/// Greedy first-fit over one cluster: place each interval in the first
/// column whose last end does not pass the interval's start, else open a
/// new column.
fn pack_cluster(cluster: &[&PackItem], out: &mut Vec<PackedColumn>) {
    let mut column_ends: Vec<i32> = Vec::new();
    let mut placements: Vec<(i64, usize)> = Vec::with_capacity(cluster.len());

    for item in cluster {
        let column_index = match column_ends.iter().position(|&end| end <= item.start_min) {
            Some(index) => index,
            None => {
                column_ends.push(i32::MIN);
                column_ends.len() - 1
            }
        };
        column_ends[column_index] = item.effective_end();
        placements.push((item.id, column_index));
    }

    let column_count = column_ends.len();
    out.extend(placements.into_iter().map(|(id, column_index)| {
        PackedColumn {
            id,
            column_index,
            column_count,
        }
    }));
}
