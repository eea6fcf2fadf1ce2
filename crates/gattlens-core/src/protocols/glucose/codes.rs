use crate::protocols::common::wire_codes;

wire_codes! {
    GlucoseType, "glucose type" {
        CapillaryWholeBlood = 1,
        CapillaryPlasma = 2,
        VenousWholeBlood = 3,
        VenousPlasma = 4,
        ArterialWholeBlood = 5,
        ArterialPlasma = 6,
        UndeterminedWholeBlood = 7,
        UndeterminedPlasma = 8,
        InterstitialFluid = 9,
        ControlSolution = 10,
    }
}

wire_codes! {
    SampleLocation, "sample location" {
        Finger = 1,
        AlternateSiteTest = 2,
        Earlobe = 3,
        ControlSolution = 4,
        SubcutaneousTissue = 5,
        NotAvailable = 15,
    }
}

wire_codes! {
    CarbohydrateId, "carbohydrate" {
        Breakfast = 1,
        Lunch = 2,
        Dinner = 3,
        Snack = 4,
        Drink = 5,
        Supper = 6,
        Brunch = 7,
    }
}

wire_codes! {
    Meal, "meal" {
        Preprandial = 1,
        Postprandial = 2,
        Fasting = 3,
        Casual = 4,
        Bedtime = 5,
    }
}

wire_codes! {
    Tester, "tester" {
        SelfTest = 1,
        HealthCareProfessional = 2,
        LabTest = 3,
        NotAvailable = 15,
    }
}

wire_codes! {
    Health, "health" {
        MinorHealthIssues = 1,
        MajorHealthIssues = 2,
        DuringMenses = 3,
        UnderStress = 4,
        NoHealthIssues = 5,
        NotAvailable = 15,
    }
}

wire_codes! {
    MedicationId, "medication" {
        RapidActingInsulin = 1,
        ShortActingInsulin = 2,
        IntermediateActingInsulin = 3,
        LongActingInsulin = 4,
        PreMixedInsulin = 5,
    }
}
