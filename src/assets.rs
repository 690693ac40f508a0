// @generated by carton-gen 0.1.0. DO NOT EDIT.
//
// Embedded snapshot of `templates`. Regenerate with:
//   carton-gen crate carton templates src/assets.rs

use std::sync::OnceLock;

use crate::{EmbeddedStore, FileRecord};

/// Embedded copy of `templates` (1 files).
pub fn carton() -> &'static EmbeddedStore {
    static STORE: OnceLock<EmbeddedStore> = OnceLock::new();
    STORE.get_or_init(|| {
        EmbeddedStore::from_records([
            FileRecord::new(
                "carton.tpl",
                r"
+,^C)z!X!:;_/@+D%)(gSX@h5N$/0aYcjhaDdPN5hD44'f?)RsIQ%Vl1o\Z~BPgM4dLU_fZIXXkO^uH=
JC1/iLeH)JmQIO:[K;sMVe>=>lFWJA1#-Y?:9IJ/EQmIUd@(KQNQ8t[:U,3gp5WLA9cd5ukFL5TfF6j+
HG@<Gc'B.9-;TMY=p&q!:Z0RG57R~r@fKoo!.Um44&<+jn2[:WhT.,UM,X4e9V:V%)WY>8A8`KfBMCm+
NP0Rf481qB6<$&2$J^C7(A!u?me_4oRW[<d9<pj%NWseH+~N)tLhAPYO9'?_>ME(q~<-hcmk#2b\qYM=
U$kMM.k6euAB[i+_<kLnkP~lBbf^O,Jp%?^J_Ki:uQg/0e'>Cg<AdCE]7QhHch#_KZ1Yp*T61*T:d780
H,;)Dp7PM?(k^[du8]md5s5Q/eNj@.MNIcLS1h]:Pb.R-MV'~+\)#NK]DFo_&WekO/>i&i7!pbZmlj%K
]%\`Rt!!!",
                1787558468819988335,
            ),
        ])
        .with_local_root("templates")
    })
}
