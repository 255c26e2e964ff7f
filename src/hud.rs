use crate::crane::CraneStatus;
use crate::snapshot::Snapshot;

pub fn status_label(status: CraneStatus) -> &'static str {
	match status {
		CraneStatus::Idle => "Idle",
		CraneStatus::Moving => "Moving",
		CraneStatus::Attaching => "Attaching",
		CraneStatus::Detaching => "Detaching",
		CraneStatus::Waiting => "Waiting",
	}
}

pub fn format_hud(snap: &Snapshot) -> String {
	let cmd = snap
		.active_command
		.map(|i| format!("#{}", i))
		.unwrap_or_else(|| "-".to_string());
	format!(
		"Crane {} | {} | Carrying: {} | Containers: {} | Cmd: {} | t={:.2}s",
		snap.position,
		status_label(snap.status),
		if snap.carrying { "yes" } else { "no" },
		snap.total_containers(),
		cmd,
		snap.elapsed.as_secs_f64()
	)
}

/// One line per x row listing the stack height of each z column.
pub fn format_column_panel(snap: &Snapshot) -> Vec<String> {
	let mut out = Vec::new();
	out.push(format!("[Columns {}]", snap.size));
	for x in 0..snap.size.width {
		let row: Vec<String> = (0..snap.size.depth)
			.map(|z| {
				let h = snap.height_at(x, z);
				if snap.resting.x == x && snap.resting.z == z {
					format!("[{}]", h)
				} else {
					format!(" {} ", h)
				}
			})
			.collect();
		out.push(format!("x={} |{}|", x, row.join("")));
	}
	out
}
