use serde::Serialize;

use crate::save::{ClassTemplate, GameObject, GameObjectGroup, SaveGame, SaveVersion};

/// Colony summary drawn from the header and body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColonyInfo {
	/// Colony name.
	pub base_name: Option<String>,
	/// Elapsed cycles.
	pub cycles: Option<i64>,
	/// Living duplicants.
	pub duplicants: Option<i64>,
	/// Game build that wrote the file.
	pub build_version: u32,
	/// Body version.
	pub version: SaveVersion,
	/// Active DLC id, if any.
	pub dlc_id: Option<String>,
	/// Cluster layout id.
	pub cluster_id: Option<String>,
	/// Whether the body is compressed.
	pub compressed: bool,
	/// Templates in the file.
	pub template_count: usize,
	/// Object groups in the file.
	pub group_count: usize,
	/// Game objects across all groups.
	pub object_count: usize,
}

impl SaveGame {
	/// Distinct prefab names in first-seen order.
	pub fn prefab_names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = Vec::new();
		for group in &self.groups {
			if !names.contains(&group.prefab_name.as_str()) {
				names.push(group.prefab_name.as_str());
			}
		}
		names
	}

	/// Groups whose prefab is `name`.
	pub fn groups_by_prefab<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a GameObjectGroup> + 'a {
		self.groups.iter().filter(move |group| group.prefab_name == name)
	}

	/// Objects of every group whose prefab is `name`.
	pub fn objects_by_prefab<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a GameObject> + 'a {
		self.groups_by_prefab(name).flat_map(|group| group.objects.iter())
	}

	/// Object count per prefab, merged across groups, in first-seen order.
	pub fn prefab_counts(&self) -> Vec<(&str, usize)> {
		let mut counts: Vec<(&str, usize)> = Vec::new();
		for group in &self.groups {
			match counts.iter_mut().find(|(name, _)| *name == group.prefab_name) {
				Some((_, count)) => *count += group.objects.len(),
				None => counts.push((group.prefab_name.as_str(), group.objects.len())),
			}
		}
		counts
	}

	/// Game objects across all groups.
	pub fn object_count(&self) -> usize {
		self.groups.iter().map(|group| group.objects.len()).sum()
	}

	/// Template used to decode `name`.
	pub fn template(&self, name: &str) -> Option<&ClassTemplate> {
		self.templates.get(name)
	}

	/// Summarize header game info and body version.
	pub fn colony_info(&self) -> ColonyInfo {
		let info = &self.header.game_info;
		ColonyInfo {
			base_name: info.base_name().map(str::to_owned),
			cycles: info.number_of_cycles(),
			duplicants: info.number_of_duplicants(),
			build_version: self.header.build_version,
			version: self.version,
			dlc_id: info.dlc_id().map(str::to_owned),
			cluster_id: info.cluster_id().map(str::to_owned),
			compressed: self.header.compression.is_compressed(),
			template_count: self.templates.len(),
			group_count: self.groups.len(),
			object_count: self.object_count(),
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use crate::save::{
		ClassTemplate, Compression, GameInfo, GameObject, GameObjectGroup, ObjectValue, Quaternion, SaveGame, SaveHeader, SaveVersion, TemplateTable, Vector3,
	};

	fn object() -> GameObject {
		GameObject {
			position: Vector3::default(),
			rotation: Quaternion::default(),
			scale: Vector3 { x: 1.0, y: 1.0, z: 1.0 },
			folder: 0,
			behaviors: Vec::new(),
		}
	}

	fn group(name: &str, count: usize) -> GameObjectGroup {
		GameObjectGroup {
			prefab_name: name.to_owned(),
			objects: (0..count).map(|_| object()).collect(),
		}
	}

	fn save() -> SaveGame {
		let info = json!({ "baseName": "Mossy Den", "numberOfCycles": 40, "numberOfDuplicants": 6, "dlcId": "" });
		let serde_json::Value::Object(map) = info else {
			unreachable!("literal is an object");
		};
		SaveGame {
			header: SaveHeader {
				build_version: 555,
				header_version: 1,
				compression: Compression::Zlib,
				game_info: GameInfo::from_map(map),
			},
			templates: TemplateTable::new(vec![ClassTemplate {
				name: "Game".into(),
				fields: Vec::new(),
				properties: Vec::new(),
			}]),
			world: ObjectValue::new("Game"),
			settings: ObjectValue::new("Game"),
			sim_data: Vec::new(),
			sentinel: *b"KSAV",
			version: SaveVersion::SUPPORTED,
			groups: vec![group("Minion", 2), group("Tile", 5), group("Minion", 1)],
			game_data: Vec::new(),
		}
	}

	#[test]
	fn prefab_names_are_distinct_in_first_seen_order() {
		assert_eq!(save().prefab_names(), ["Minion", "Tile"]);
	}

	#[test]
	fn counts_merge_repeated_prefabs() {
		let save = save();
		assert_eq!(save.prefab_counts(), [("Minion", 3), ("Tile", 5)]);
		assert_eq!(save.object_count(), 8);
		assert_eq!(save.groups_by_prefab("Minion").count(), 2);
		assert_eq!(save.objects_by_prefab("Minion").count(), 3);
		assert_eq!(save.objects_by_prefab("Door").count(), 0);
	}

	#[test]
	fn colony_info_reads_header_keys() {
		let save = save();
		let info = save.colony_info();
		assert_eq!(info.base_name.as_deref(), Some("Mossy Den"));
		assert_eq!(info.cycles, Some(40));
		assert_eq!(info.duplicants, Some(6));
		assert_eq!(info.version, SaveVersion::SUPPORTED);
		assert!(info.compressed);
		assert_eq!(info.object_count, 8);
		assert!(save.template("Game").is_some());
		assert!(save.template("Minion").is_none());
	}
}
