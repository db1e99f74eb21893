use phf::{Map, phf_map};

static ONE_LETTER_CODES: Map<&'static str, char> = phf_map! {
    "ALA" => 'A', "ARG" => 'R', "ASN" => 'N', "ASP" => 'D', "CYS" => 'C',
    "GLN" => 'Q', "GLU" => 'E', "GLY" => 'G', "HIS" => 'H', "ILE" => 'I',
    "LEU" => 'L', "LYS" => 'K', "MET" => 'M', "PHE" => 'F', "PRO" => 'P',
    "SER" => 'S', "THR" => 'T', "TRP" => 'W', "TYR" => 'Y', "VAL" => 'V',
    "SEC" => 'U', "PYL" => 'O', "MSE" => 'M', "HSD" => 'H', "HSE" => 'H', "HSP" => 'H',
    "A" => 'A', "C" => 'C', "G" => 'G', "U" => 'U', "I" => 'I',
    "DA" => 'A', "DC" => 'C', "DG" => 'G', "DT" => 'T', "DI" => 'I',
};

/// One-letter code for a residue name, `'X'` when the name is not a standard monomer.
pub fn one_letter_code(residue_name: &str) -> char {
    ONE_LETTER_CODES
        .get(residue_name.trim().to_ascii_uppercase().as_str())
        .copied()
        .unwrap_or('X')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_letter_code_maps_standard_amino_acids() {
        assert_eq!(one_letter_code("CYS"), 'C');
        assert_eq!(one_letter_code("GLU"), 'E');
        assert_eq!(one_letter_code("LEU"), 'L');
        assert_eq!(one_letter_code("TRP"), 'W');
    }

    #[test]
    fn one_letter_code_maps_nucleotides() {
        assert_eq!(one_letter_code("DA"), 'A');
        assert_eq!(one_letter_code("U"), 'U');
    }

    #[test]
    fn one_letter_code_trims_and_ignores_case() {
        assert_eq!(one_letter_code(" gly "), 'G');
    }

    #[test]
    fn one_letter_code_falls_back_to_x() {
        assert_eq!(one_letter_code("HEM"), 'X');
        assert_eq!(one_letter_code(""), 'X');
    }
}
