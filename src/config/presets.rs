//! Built-in format sets.
//!
//! Every set is layered over [`BASE`]; a set only lists the keys it changes.

/// Key/value pairs of one format set.
pub type Preset = &'static [(&'static str, &'static str)];

/// Defaults shared by every format set.
pub const BASE: Preset = &[
    ("lvcp", ""),
    ("lvver", ""),
    ("lvpath", ""),
    ("sep_lvcp", "\n"),
    ("sep_lvver", ""),
    ("sep_lvpath", ""),
    ("sep", ", "),
    ("sym_none", " * "),
    ("sym_installed", "[I]"),
    ("sym_upgrade", "[U]"),
    ("sym_downgrade", "[D]"),
    ("prefix_installed", "\x1b[0;32m\x1b[7m"),
    ("suffix_installed", "\x1b[0m"),
    ("prefix_available", "\x1b[0;44m"),
    ("suffix_available", "\x1b[0m"),
    ("prefix_matched", "\x1b[0;44m"),
    ("suffix_matched", "\x1b[0m"),
    ("prefix_exists", "\x1b[0;32m\x1b[7m"),
    ("suffix_exists", "\x1b[0m"),
    ("repr_true_exists", "Exists"),
    ("repr_false_exists", "Does not exist"),
    ("repr_empty_installed", "Not installed"),
    ("repr_empty_ver_installed", "[ Not Installed ]"),
    ("repr_empty_ver_available", "[ Not Available ]"),
    ("repr_empty_ver_all", "[ No Information ]"),
    ("repr_empty_ver", "[ No Information ]"),
    ("noresult", "Sorry, no results found.\n"),
];

const E_FILE_UNIQ: Preset = &[
    (
        "lvcp",
        concat!(
            "{symbol} {c}/\x1b[1m{p}\x1b[0m\n",
            "{lvcp_sub_aux_if_ver_available}",
            "{lvcp_sub_inst_if_ver_installed}",
            "\x1b[0;32m     Link to PFL file list:\x1b[0m\t{cp_pfl}\n",
            "\x1b[0;32m     All matched files:\x1b[0m\t\t{path_all_str_hl}\n",
        ),
    ),
    (
        "lvcp_sub_aux_if_ver_available",
        concat!(
            "\x1b[0;32m     Homepage:\x1b[0m\t\t\t{homepage}\n",
            "\x1b[0;32m     Description:\x1b[0m\t\t{description}\n",
            "\x1b[0;32m     Available versions:\x1b[0m\t{ver_available_str_hl}\n",
        ),
    ),
    (
        "lvcp_sub_inst_if_ver_installed",
        "\x1b[0;32m     Installed versions:\x1b[0m\t{ver_installed_str_hl}\n",
    ),
];

const E_FILE_ALLVER: Preset = &[
    (
        "lvcp",
        concat!(
            "{symbol} {c}/\x1b[1m{p}\x1b[0m\n",
            "{lvcp_sub_aux_if_ver_available}",
            "{lvcp_sub_inst_if_ver_installed}",
            "\x1b[0;32m     All matched versions:\x1b[0m\t{ver_all_str_hl}\n",
            "\n{lvver}",
        ),
    ),
    (
        "lvver",
        concat!(
            "\x1b[0;32m     File found in version:\x1b[0m\t{lvver_ver_hl}{lvver_symbol}\n",
            "\x1b[0;32m     Link to PFL file list of the version:\x1b[0m\t{lvver_ver_pfl}\n",
            "\x1b[0;32m     All matched files:\x1b[0m\t\t{path_all_str_hl}\n",
        ),
    ),
    ("sep_lvver", "\n"),
    (
        "lvcp_sub_aux_if_ver_available",
        concat!(
            "\x1b[0;32m     Homepage:\x1b[0m\t\t\t{homepage}\n",
            "\x1b[0;32m     Description:\x1b[0m\t\t{description}\n",
            "\x1b[0;32m     Available versions:\x1b[0m\t{ver_available_str_hl}\n",
        ),
    ),
    (
        "lvcp_sub_inst_if_ver_installed",
        "\x1b[0;32m     Installed versions:\x1b[0m\t{ver_installed_str_hl}\n",
    ),
];

const E_FILE_CPTOV: Preset = &[("lvcp", "{lvver}"), ("lvver", "{lvver_ver_hl}\n")];

const E_FILE_CPVTOF: Preset = &[
    ("lvcp", "{lvver}"),
    ("lvver", "{lvpath}"),
    ("lvpath", "{lvpath_path_hl}\n"),
];

const FULL_UNIQ: Preset = &[
    (
        "lvcp",
        concat!(
            "{symbol} {c}/\x1b[1m{p}\x1b[0m\n",
            "\x1b[0;32m     Homepage:\x1b[0m\t\t\t{homepage}\n",
            "\x1b[0;32m     Description:\x1b[0m\t\t{description}\n",
            "\x1b[0;32m     Link to PFL file list:\x1b[0m\t{cp_pfl}\n",
            "\x1b[0;32m     Available versions:\x1b[0m\t{ver_available_str_hl}\n",
            "\x1b[0;32m     Installed versions:\x1b[0m\t{ver_installed_str_hl}\n",
            "\x1b[0;32m     All matched files:\x1b[0m\t\t{path_all_str_hl}\n",
            "\n{lvver}",
        ),
    ),
    ("lvver", "{lvpath}"),
    (
        "lvpath",
        concat!(
            "\x1b[0;32m     Matched file:\x1b[0m\t\t{lvpath_path_hl}\n",
            "\x1b[0;32m     File found with USE flag:\x1b[0m\t{lvpath_use_str}\n",
            "\x1b[0;32m     File found in arch:\x1b[0m\t{lvpath_arch_str}\n",
        ),
    ),
    ("sep_lvpath", "\n"),
];

const FULL_ALLVER: Preset = &[
    (
        "lvcp",
        concat!(
            "{symbol} {c}/\x1b[1m{p}\x1b[0m\n",
            "\x1b[0;32m     Homepage:\x1b[0m\t\t\t{homepage}\n",
            "\x1b[0;32m     Description:\x1b[0m\t\t{description}\n",
            "\x1b[0;32m     Link to PFL file list:\x1b[0m\t{cp_pfl}\n",
            "\x1b[0;32m     Available versions:\x1b[0m\t{ver_available_str_hl}\n",
            "\x1b[0;32m     Installed versions:\x1b[0m\t{ver_installed_str_hl}\n",
            "\n{lvver}",
        ),
    ),
    (
        "lvver",
        concat!(
            "\x1b[0;32m     File found in version:\x1b[0m\t{lvver_ver_hl}{lvver_symbol}\n",
            "\x1b[0;32m     All matched files:\x1b[0m\t\t{lvver_path_all_str_hl}\n",
            "\x1b[0;32m     Link to PFL file list of the version:\x1b[0m\t{lvver_ver_pfl}\n",
            "{lvpath}",
        ),
    ),
    ("sep_lvver", "\x1b[0;32m     -------------------\x1b[0m\n"),
    (
        "lvpath",
        concat!(
            "\x1b[0;32m     Matched file:\x1b[0m\t\t{lvpath_path_hl}\n",
            "\x1b[0;32m     File exists locally?:\x1b[0m\t{lvpath_exists_str}\n",
            "\x1b[0;32m     File found with USE flag:\x1b[0m\t{lvpath_use_str}\n",
            "\x1b[0;32m     File found in arch:\x1b[0m\t{lvpath_arch_str}\n",
        ),
    ),
    ("sep_lvpath", "\n"),
];

const FULL_CPTOV: Preset = &[
    (
        "lvcp",
        concat!(
            "{symbol} {c}/\x1b[1m{p}\x1b[0m\n",
            "\x1b[0;32m     Homepage:\x1b[0m\t\t\t{homepage}\n",
            "\x1b[0;32m     Description:\x1b[0m\t\t{description}\n",
            "\x1b[0;32m     Link to PFL file list:\x1b[0m\t{cp_pfl}\n",
            "\x1b[0;32m     Available versions:\x1b[0m\t{ver_available_str_hl}\n",
            "\x1b[0;32m     Installed versions:\x1b[0m\t{ver_installed_str_hl}\n",
            "\n{lvver}",
        ),
    ),
    (
        "lvver",
        concat!(
            "\x1b[0;32m     Version:\x1b[0m\t{lvver_ver_hl}{lvver_symbol}\n",
            "\x1b[0;32m     Link to PFL file list of the version:\x1b[0m\t{lvver_ver_pfl}\n",
            "{lvpath}",
        ),
    ),
    ("sep_lvver", "\n"),
];

const FULL_CPVTOF: Preset = &[
    (
        "lvcp",
        concat!(
            "{symbol} {c}/\x1b[1m{p}\x1b[0m\n",
            "\x1b[0;32m     Homepage:\x1b[0m\t\t\t{homepage}\n",
            "\x1b[0;32m     Description:\x1b[0m\t\t{description}\n",
            "\x1b[0;32m     Available versions:\x1b[0m\t{ver_available_str_hl}\n",
            "\x1b[0;32m     Installed versions:\x1b[0m\t{ver_installed_str_hl}\n",
            "\n{lvver}",
        ),
    ),
    (
        "lvver",
        concat!(
            "\x1b[0;32m     File found in version:\x1b[0m\t{lvver_ver_hl}{lvver_symbol}\n",
            "\x1b[0;32m     Link to PFL file list of the version:\x1b[0m\t{lvver_ver_pfl}\n",
            "\n{lvpath}",
        ),
    ),
    (
        "lvpath",
        concat!(
            "\x1b[0;32m     Matched file:\x1b[0m\t\t{lvpath_path_hl}\n",
            "\x1b[0;32m     File exists locally?:\x1b[0m\t{lvpath_exists_str}\n",
            "\x1b[0;32m     File found with USE flag:\x1b[0m\t{lvpath_use_str}\n",
            "\x1b[0;32m     File found in arch:\x1b[0m\t{lvpath_arch_str}\n",
        ),
    ),
    ("sep_lvpath", "\n"),
];

const RAW_UNIQ: Preset = &[("lvcp", "{cp}\n"), ("sep_lvcp", "")];

const RAW_ALLVER: Preset = &[
    ("lvcp", "{lvver}"),
    ("sep_lvcp", ""),
    ("lvver", "{lvver_cpv}\n"),
];

const RAW_CPTOV: Preset = &[("lvcp", "{lvver}"), ("lvver", "{ver}\n")];

const RAW_CPVTOF: Preset = &[
    ("lvcp", "{lvver}"),
    ("lvver", "{lvpath}"),
    ("lvpath", "{path}\n"),
];

/// Every built-in set by name, `base` excluded.
const PRESETS: &[(&str, Preset)] = &[
    ("e_file_uniq", E_FILE_UNIQ),
    ("e_file_allver", E_FILE_ALLVER),
    ("e_file_cptov", E_FILE_CPTOV),
    ("e_file_cpvtof", E_FILE_CPVTOF),
    ("full_uniq", FULL_UNIQ),
    ("full_allver", FULL_ALLVER),
    ("full_cptov", FULL_CPTOV),
    ("full_cpvtof", FULL_CPVTOF),
    ("raw_uniq", RAW_UNIQ),
    ("raw_allver", RAW_ALLVER),
    ("raw_cptov", RAW_CPTOV),
    ("raw_cpvtof", RAW_CPVTOF),
];

/// What: Look up a built-in format set.
#[must_use]
pub fn preset(name: &str) -> Option<Preset> {
    PRESETS.iter().find(|(n, _)| *n == name).map(|(_, p)| *p)
}

/// Names of the built-in format sets.
pub fn preset_names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|(n, _)| *n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Every mode has a set in each family.
    fn every_family_covers_every_mode() {
        for family in ["e_file", "full", "raw"] {
            for mode in ["uniq", "allver", "cptov", "cpvtof"] {
                assert!(preset(&format!("{family}_{mode}")).is_some(), "{family}_{mode}");
            }
        }
        assert!(preset("base").is_none());
        assert_eq!(preset_names().count(), 12);
    }
}
