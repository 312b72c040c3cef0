/// Numeric character reference for a named HTML entity.
///
/// `amp`, `lt`, `gt`, `quot` and `apos` have no entry: rewriting them could
/// change existing markup.
pub fn numeric_reference(name: &str) -> Option<&'static str> {
    let numeric = match name {
        "AElig" => "&#198;",
        "Aacute" => "&#193;",
        "Acirc" => "&#194;",
        "Agrave" => "&#192;",
        "Alpha" => "&#913;",
        "Aring" => "&#197;",
        "Atilde" => "&#195;",
        "Auml" => "&#196;",
        "Beta" => "&#914;",
        "Ccedil" => "&#199;",
        "Chi" => "&#935;",
        "Dagger" => "&#x2021;",
        "Delta" => "&#916;",
        "Dot" => "&#x00A8;",
        "DotDot" => "&#x20DC;",
        "ETH" => "&#208;",
        "Eacute" => "&#201;",
        "Ecirc" => "&#202;",
        "Egrave" => "&#200;",
        "Epsilon" => "&#917;",
        "Eta" => "&#919;",
        "Euml" => "&#203;",
        "Gamma" => "&#915;",
        "Iacute" => "&#205;",
        "Icirc" => "&#206;",
        "Igrave" => "&#204;",
        "Iota" => "&#921;",
        "Iuml" => "&#207;",
        "Kappa" => "&#922;",
        "Lambda" => "&#923;",
        "Mu" => "&#924;",
        "Ntilde" => "&#209;",
        "Nu" => "&#925;",
        "Oacute" => "&#211;",
        "Ocirc" => "&#212;",
        "Ograve" => "&#210;",
        "Omega" => "&#937;",
        "Omicron" => "&#927;",
        "Oslash" => "&#216;",
        "Otilde" => "&#213;",
        "Ouml" => "&#214;",
        "Phi" => "&#934;",
        "Pi" => "&#928;",
        "Prime" => "&#x2033;",
        "Psi" => "&#936;",
        "Rho" => "&#929;",
        "Sigma" => "&#931;",
        "THORN" => "&#222;",
        "Tau" => "&#932;",
        "Theta" => "&#920;",
        "Uacute" => "&#218;",
        "Ucirc" => "&#219;",
        "Ugrave" => "&#217;",
        "Upsilon" => "&#933;",
        "Uuml" => "&#220;",
        "Verbar" => "&#x2016;",
        "Xi" => "&#926;",
        "Yacute" => "&#221;",
        "Yuml" => "&#376;",
        "Zeta" => "&#918;",
        "aacute" => "&#225;",
        "acirc" => "&#226;",
        "acute" => "&#180;",
        "aelig" => "&#230;",
        "agrave" => "&#224;",
        "alefsym" => "&#8501;",
        "aleph" => "&#x2135;",
        "alpha" => "&#945;",
        "and" => "&#x2227;",
        "ang" => "&#8736;",
        "ang90" => "&#x221F;",
        "angsph" => "&#x2222;",
        "angst" => "&#x212B;",
        "ap" => "&#x2248;",
        "aring" => "&#229;",
        "ast" => "&#x002A;",
        "asymp" => "&#8776;",
        "atilde" => "&#227;",
        "auml" => "&#228;",
        "becaus" => "&#x2235;",
        "bernou" => "&#x212C;",
        "beta" => "&#946;",
        "blank" => "&#x2423;",
        "blk12" => "&#x2592;",
        "blk14" => "&#x2591;",
        "blk34" => "&#x2593;",
        "block" => "&#x2588;",
        "bottom" => "&#x22A5;",
        "brvbar" => "&#166;",
        "bsol" => "&#x005C;",
        "bull" => "&#x2022;",
        "cap" => "&#x2229;",
        "caret" => "&#x2041;",
        "ccedil" => "&#231;",
        "cedil" => "&#184;",
        "cent" => "&#x00A2;",
        "check" => "&#x2713;",
        "chi" => "&#967;",
        "cir" => "&#x25CB;",
        "clubs" => "&#x2663;",
        "colon" => "&#x003A;",
        "comma" => "&#x002C;",
        "commat" => "&#x0040;",
        "compfn" => "&#x2218;",
        "cong" => "&#x2245;",
        "conint" => "&#x222E;",
        "copy" => "&#x00A9;",
        "copysr" => "&#x2117;",
        "crarr" => "&#8629;",
        "cross" => "&#x2717;",
        "cup" => "&#x222A;",
        "curren" => "&#x00A4;",
        "dArr" => "&#8659;",
        "dagger" => "&#x2020;",
        "darr" => "&#x2193;",
        "dash" => "&#x2010;",
        "deg" => "&#x00B0;",
        "delta" => "&#948;",
        "diams" => "&#9830;",
        "divide" => "&#x00F7;",
        "dlcrop" => "&#x230D;",
        "dollar" => "&#x0024;",
        "drcrop" => "&#x230C;",
        "dtri" => "&#x25BF;",
        "dtrif" => "&#x25BE;",
        "eacute" => "&#233;",
        "ecirc" => "&#234;",
        "egrave" => "&#232;",
        "empty" => "&#8709;",
        "emsp" => "&#x2003;",
        "emsp13" => "&#x2004;",
        "emsp14" => "&#x2005;",
        "ensp" => "&#8194;",
        "epsilon" => "&#949;",
        "equals" => "&#x003D;",
        "equiv" => "&#x2261;",
        "eta" => "&#951;",
        "eth" => "&#240;",
        "euml" => "&#235;",
        "excl" => "&#x0021;",
        "exist" => "&#8707;",
        "female" => "&#x2640;",
        "ffilig" => "&#xFB03;",
        "fflig" => "&#xFB00;",
        "ffllig" => "&#xFB04;",
        "filig" => "&#xFB01;",
        "flat" => "&#x266D;",
        "fllig" => "&#xFB02;",
        "fnof" => "&#402;",
        "forall" => "&#x2200;",
        "frac12" => "&#x00BD;",
        "frac13" => "&#x2153;",
        "frac14" => "&#x00BC;",
        "frac15" => "&#x2155;",
        "frac16" => "&#x2159;",
        "frac18" => "&#x215B;",
        "frac23" => "&#x2154;",
        "frac25" => "&#x2156;",
        "frac34" => "&#x00BE;",
        "frac35" => "&#x2157;",
        "frac38" => "&#x215C;",
        "frac45" => "&#x2158;",
        "frac56" => "&#x215A;",
        "frac58" => "&#x215D;",
        "frac78" => "&#x215E;",
        "frasl" => "&#8260;",
        "gamma" => "&#947;",
        "ge" => "&#x2265;",
        "hArr" => "&#8660;",
        "hairsp" => "&#x200A;",
        "half" => "&#x00BD;",
        "hamilt" => "&#x210B;",
        "harr" => "&#8596;",
        "hearts" => "&#x2665;",
        "hellip" => "&#x2026;",
        "horbar" => "&#x2015;",
        "hybull" => "&#x2043;",
        "hyphen" => "&#x002D;",
        "iacute" => "&#237;",
        "icirc" => "&#238;",
        "iexcl" => "&#161;",
        "iff" => "&#x21D4;",
        "igrave" => "&#236;",
        "image" => "&#8465;",
        "incare" => "&#x2105;",
        "infin" => "&#x221E;",
        "int" => "&#x222B;",
        "iota" => "&#953;",
        "iquest" => "&#x00BF;",
        "isin" => "&#x220A;",
        "iuml" => "&#239;",
        "kappa" => "&#954;",
        "lArr" => "&#x21D0;",
        "lagran" => "&#x2112;",
        "lambda" => "&#955;",
        "lang" => "&#x3008;",
        "laquo" => "&#x00AB;",
        "larr" => "&#x2190;",
        "lceil" => "&#8968;",
        "lcub" => "&#x007B;",
        "ldquo" => "&#x201C;",
        "ldquor" => "&#x201E;",
        "le" => "&#x2264;",
        "lfloor" => "&#8970;",
        "lhblk" => "&#x2584;",
        "lowast" => "&#x2217;",
        "lowbar" => "&#x005F;",
        "loz" => "&#x25CA;",
        "lozf" => "&#x2726;",
        "lpar" => "&#x0028;",
        "lrm" => "&#8206;",
        "lsaquo" => "&#8249;",
        "lsqb" => "&#x005B;",
        "lsquo" => "&#x2018;",
        "lsquor" => "&#x201A;",
        "ltri" => "&#x25C3;",
        "ltrif" => "&#x25C2;",
        "macr" => "&#175;",
        "male" => "&#x2642;",
        "malt" => "&#x2720;",
        "marker" => "&#x25AE;",
        "mdash" => "&#x2014;",
        "micro" => "&#x00B5;",
        "middot" => "&#x00B7;",
        "minus" => "&#x2212;",
        "mldr" => "&#x2026;",
        "mnplus" => "&#x2213;",
        "mu" => "&#956;",
        "nabla" => "&#x2207;",
        "natur" => "&#x266E;",
        "nbsp" => "&#x00A0;",
        "ndash" => "&#x2013;",
        "ne" => "&#x2260;",
        "ni" => "&#x220D;",
        "nldr" => "&#x2025;",
        "not" => "&#x00AC;",
        "notin" => "&#x2209;",
        "nsub" => "&#8836;",
        "ntilde" => "&#241;",
        "nu" => "&#957;",
        "num" => "&#x0023;",
        "numsp" => "&#x2007;",
        "oacute" => "&#243;",
        "ocirc" => "&#244;",
        "oelig" => "&#339;",
        "ograve" => "&#242;",
        "ohm" => "&#x2126;",
        "oline" => "&#8254;",
        "omega" => "&#969;",
        "omicron" => "&#959;",
        "oplus" => "&#8853;",
        "or" => "&#x2228;",
        "order" => "&#x2134;",
        "ordf" => "&#x00AA;",
        "ordm" => "&#x00BA;",
        "oslash" => "&#248;",
        "otilde" => "&#245;",
        "otimes" => "&#8855;",
        "ouml" => "&#246;",
        "par" => "&#x2225;",
        "para" => "&#x00B6;",
        "part" => "&#x2202;",
        "percnt" => "&#x0025;",
        "period" => "&#x002E;",
        "permil" => "&#x2030;",
        "perp" => "&#x22A5;",
        "phi" => "&#966;",
        "phmmat" => "&#x2133;",
        "phone" => "&#x260E;",
        "pi" => "&#960;",
        "piv" => "&#982;",
        "plus" => "&#x002B;",
        "plusmn" => "&#x00B1;",
        "pound" => "&#x00A3;",
        "prime" => "&#x2032;",
        "prod" => "&#8719;",
        "prop" => "&#x221D;",
        "psi" => "&#968;",
        "puncsp" => "&#x2008;",
        "quest" => "&#x003F;",
        "rArr" => "&#x21D2;",
        "radic" => "&#x221A;",
        "rang" => "&#9002;",
        "raquo" => "&#x00BB;",
        "rarr" => "&#x2192;",
        "rceil" => "&#8969;",
        "rcub" => "&#x007D;",
        "rdquo" => "&#x201D;",
        "rdquor" => "&#x201C;",
        "real" => "&#8476;",
        "rect" => "&#x25AD;",
        "reg" => "&#x00AE;",
        "rfloor" => "&#8971;",
        "rho" => "&#961;",
        "rpar" => "&#x0029;",
        "rsaquo" => "&#8250;",
        "rsqb" => "&#x005D;",
        "rsquo" => "&#x2019;",
        "rsquor" => "&#x2018;",
        "rtri" => "&#x25B9;",
        "rtrif" => "&#x25B8;",
        "rx" => "&#x211E;",
        "scaron" => "&#353;",
        "sdot" => "&#8901;",
        "sect" => "&#x00A7;",
        "semi" => "&#x003B;",
        "sext" => "&#x2736;",
        "sharp" => "&#x266F;",
        "shy" => "&#x00AD;",
        "sigma" => "&#963;",
        "sigmaf" => "&#962;",
        "sim" => "&#x223C;",
        "sime" => "&#x2243;",
        "sol" => "&#x002F;",
        "spades" => "&#9824;",
        "squ" => "&#x25A1;",
        "square" => "&#x25A1;",
        "squf" => "&#x25AA;",
        "star" => "&#x22C6;",
        "starf" => "&#x2605;",
        "sub" => "&#8834;",
        "sube" => "&#x2286;",
        "sum" => "&#8721;",
        "sung" => "&#x2669;",
        "sup" => "&#x2283;",
        "sup1" => "&#x00B9;",
        "sup2" => "&#x00B2;",
        "sup3" => "&#x00B3;",
        "supe" => "&#x2287;",
        "szlig" => "&#223;",
        "target" => "&#x2316;",
        "tau" => "&#964;",
        "tdot" => "&#x20DB;",
        "telrec" => "&#x2315;",
        "there4" => "&#x2234;",
        "theta" => "&#952;",
        "thetasym" => "&#977;",
        "thinsp" => "&#x2009;",
        "thorn" => "&#254;",
        "tilde" => "&#732;",
        "times" => "&#x00D7;",
        "tprime" => "&#x2034;",
        "trade" => "&#x2122;",
        "uArr" => "&#8657;",
        "uacute" => "&#250;",
        "uarr" => "&#x2191;",
        "ucirc" => "&#251;",
        "ugrave" => "&#249;",
        "uhblk" => "&#x2580;",
        "ulcrop" => "&#x230F;",
        "uml" => "&#168;",
        "upsih" => "&#978;",
        "upsilon" => "&#965;",
        "urcrop" => "&#x230E;",
        "utri" => "&#x25B5;",
        "utrif" => "&#x25B4;",
        "uuml" => "&#252;",
        "vellip" => "&#x22EE;",
        "verbar" => "&#x007C;",
        "wedgeq" => "&#x2259;",
        "weierp" => "&#8472;",
        "xi" => "&#958;",
        "yacute" => "&#253;",
        "yen" => "&#x00A5;",
        "yuml" => "&#255;",
        "zeta" => "&#950;",
        "zwnj" => "&#8204;",
        _ => return None,
    };
    Some(numeric)
}

/// Replaces every named reference that has a table entry with its numeric form.
/// Unknown names, including the five markup entities, are copied as-is.
pub fn replace_named_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    let bytes = s.as_bytes();
    while i < bytes.len() {
        let Some(amp_rel) = s[i..].find('&') else {
            out.push_str(&s[i..]);
            break;
        };
        let amp = i + amp_rel;
        out.push_str(&s[i..amp]);
        let name_end = s[amp + 1..]
            .find(|c: char| !c.is_ascii_alphanumeric())
            .map(|d| amp + 1 + d)
            .unwrap_or(s.len());
        let name = &s[amp + 1..name_end];
        let closed = bytes.get(name_end) == Some(&b';');
        match numeric_reference(name) {
            Some(numeric) if closed && !name.is_empty() => {
                out.push_str(numeric);
                i = name_end + 1;
            }
            _ => {
                out.push('&');
                i = amp + 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_become_numeric_markup_entities_stay() {
        assert_eq!(
            replace_named_entities("&nbsp;&hellip;&amp;"),
            "&#x00A0;&#x2026;&amp;"
        );
        assert_eq!(
            replace_named_entities("&lt;b&gt; &quot;q&quot; &apos;"),
            "&lt;b&gt; &quot;q&quot; &apos;"
        );
    }

    #[test]
    fn first_table_entry_wins_for_duplicates() {
        assert_eq!(numeric_reference("aleph"), Some("&#x2135;"));
        assert_eq!(numeric_reference("brvbar"), Some("&#166;"));
        assert_eq!(numeric_reference("eacute"), Some("&#233;"));
        assert_eq!(numeric_reference("Eacute"), Some("&#201;"));
    }

    #[test]
    fn unknown_or_unterminated_references_pass_through() {
        assert_eq!(replace_named_entities("&bogus; &nbsp x"), "&bogus; &nbsp x");
        assert_eq!(replace_named_entities("AT&T"), "AT&T");
        assert_eq!(replace_named_entities("tail &"), "tail &");
    }

    #[test]
    fn entity_after_escaped_ampersand_is_still_rewritten() {
        assert_eq!(replace_named_entities("&amp;copy;"), "&amp;copy;");
        assert_eq!(replace_named_entities("&amp;&copy;"), "&amp;&#x00A9;");
    }

    #[test]
    fn non_ascii_text_is_untouched() {
        assert_eq!(replace_named_entities("ϕ &alpha; ü"), "ϕ &#945; ü");
    }
}
